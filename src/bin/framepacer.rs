use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framepacer::{FramePacer, MonotonicClock, PacerOpts, SleepTicker};

#[derive(Parser, Debug)]
#[command(name = "framepacer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a pacer against the real clock and report the achieved rates.
    Pace(PaceArgs),
}

#[derive(Parser, Debug)]
struct PaceArgs {
    /// Target draw rate in frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// How long to run, in whole seconds.
    #[arg(long, default_value_t = 3)]
    seconds: u64,

    /// Host refresh cadence driving the loop, in Hz.
    #[arg(long, default_value_t = 240)]
    refresh_hz: u32,

    /// Gate draws on a simulated producer (one frame in flight at a time).
    #[arg(long)]
    backpressure: bool,

    /// Completion rate of the simulated producer when --backpressure is set.
    #[arg(long, default_value_t = 60.0)]
    producer_fps: f64,

    /// Simulated draw cost per frame, in milliseconds.
    #[arg(long, default_value_t = 0)]
    draw_ms: u64,

    /// Print the report as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Pace(args) => cmd_pace(args),
    }
}

fn cmd_pace(args: PaceArgs) -> anyhow::Result<()> {
    let mut pacer = FramePacer::configure(
        args.fps,
        PacerOpts {
            backpressure: args.backpressure,
        },
    )?;
    let handle = pacer.handle();

    let draw_cost = Duration::from_millis(args.draw_ms);
    let draws = Arc::new(AtomicU64::new(0));
    let draws_in_action = Arc::clone(&draws);
    pacer.set_draw(move || {
        if !draw_cost.is_zero() {
            thread::sleep(draw_cost);
        }
        draws_in_action.fetch_add(1, Ordering::Relaxed);
    });

    // End-of-stream stand-in: stop the pacer after the requested duration.
    let stopper = handle.clone();
    let run_for = Duration::from_secs(args.seconds.max(1));
    let stop_timer = thread::spawn(move || {
        thread::sleep(run_for);
        stopper.stop();
    });

    // Simulated producer: completion notifications open the gate.
    let producer = if args.backpressure {
        anyhow::ensure!(args.producer_fps > 0.0, "--producer-fps must be positive");
        let unblocker = handle.clone();
        let period = Duration::from_secs_f64(1.0 / args.producer_fps);
        Some(thread::spawn(move || {
            while unblocker.is_running() {
                unblocker.unblock();
                thread::sleep(period);
            }
        }))
    } else {
        None
    };

    let clock = MonotonicClock::new();
    let mut ticker = SleepTicker::with_refresh_hz(args.refresh_hz);
    let report = framepacer::run(&mut pacer, &clock, &mut ticker)?;

    stop_timer
        .join()
        .map_err(|_| anyhow::anyhow!("stop timer thread panicked"))?;
    if let Some(producer) = producer {
        producer
            .join()
            .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;
    }

    if args.json {
        let out = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{out}");
    } else {
        eprintln!(
            "target {} fps over {} full second(s): average {:.2} fps",
            report.target_fps,
            report.seconds(),
            report.average_fps()
        );
        eprintln!("per-second counts: {:?}", report.samples);
        eprintln!("total draws: {}", draws.load(Ordering::Relaxed));
    }
    Ok(())
}
