use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use framepacer::{FramePacer, MonotonicClock, PacerOpts, SleepTicker, run};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn handle_stops_the_loop_from_another_thread() {
    init_tracing();
    let mut pacer = FramePacer::configure(60.0, PacerOpts::default()).unwrap();
    let handle = pacer.handle();
    let draws = Arc::new(AtomicU32::new(0));
    let draws_in_action = Arc::clone(&draws);
    pacer.set_draw(move || {
        draws_in_action.fetch_add(1, Ordering::Relaxed);
    });

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        handle.stop();
    });

    let clock = MonotonicClock::new();
    let mut ticker = SleepTicker::with_refresh_hz(240);
    let report = run(&mut pacer, &clock, &mut ticker).unwrap();

    stopper.join().unwrap();
    assert!(!pacer.is_running());
    // 200 ms at 60 fps leaves comfortable room for at least a couple of draws.
    assert!(draws.load(Ordering::Relaxed) >= 2);
    assert_eq!(report.target_fps, 60.0);
}

#[test]
fn worker_completion_gates_one_frame_in_flight() {
    init_tracing();
    // A worker thread plays the off-thread renderer: each draw posts a job,
    // each completion opens the gate for exactly one more draw. The worker
    // stops the pacer after ten jobs, so exactly ten draws happen no matter
    // how fast the host loop ticks.
    let mut pacer = FramePacer::configure(500.0, PacerOpts { backpressure: true }).unwrap();
    let handle = pacer.handle();

    let (job_tx, job_rx) = mpsc::channel::<u32>();
    let draws = Arc::new(AtomicU32::new(0));
    let draws_in_action = Arc::clone(&draws);
    pacer.set_draw(move || {
        let seq = draws_in_action.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = job_tx.send(seq);
    });

    let worker_handle = handle.clone();
    let worker = thread::spawn(move || {
        let mut completed = 0u32;
        while let Ok(_job) = job_rx.recv() {
            completed += 1;
            if completed < 10 {
                worker_handle.unblock();
            } else {
                worker_handle.stop();
                break;
            }
        }
        completed
    });

    // Prime the gate so the first frame may draw at all.
    handle.unblock();

    let clock = MonotonicClock::new();
    let mut ticker = SleepTicker::with_refresh_hz(2000);
    run(&mut pacer, &clock, &mut ticker).unwrap();

    let completed = worker.join().unwrap();
    assert_eq!(completed, 10);
    assert_eq!(draws.load(Ordering::Relaxed), 10);
}
