use std::thread;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::PacerResult;
use crate::pacer::{FramePacer, TickOutcome};
use crate::report::RateReport;

/// Host "next drawing opportunity" primitive.
///
/// Implementations block the loop until the host is ready for another frame
/// decision; the pacer decides whether anything actually runs.
pub trait TickSource {
    fn wait_next_frame(&mut self);
}

/// Fixed-cadence [`TickSource`] backed by `thread::sleep`, standing in for a
/// display refresh callback.
#[derive(Clone, Copy, Debug)]
pub struct SleepTicker {
    period: Duration,
}

impl SleepTicker {
    /// Tick at a display refresh rate. Rates are clamped to at least 1 Hz.
    pub fn with_refresh_hz(refresh_hz: u32) -> Self {
        let safe_hz = refresh_hz.max(1);
        Self {
            period: Duration::from_nanos(1_000_000_000u64 / u64::from(safe_hz)),
        }
    }
}

impl TickSource for SleepTicker {
    fn wait_next_frame(&mut self) {
        thread::sleep(self.period);
    }
}

/// Drive `pacer` until it observes its terminal flag, then report the
/// achieved per-second rates.
///
/// One tick per host drawing opportunity, then wait for the next one. The
/// loop is explicit (rather than a self-rescheduling callback) so stopping is
/// a flag check, not a pending-callback cancellation. Errors from
/// [`FramePacer::tick`] are programming errors and abort the loop.
#[tracing::instrument(skip_all)]
pub fn run<C: Clock, T: TickSource>(
    pacer: &mut FramePacer,
    clock: &C,
    ticker: &mut T,
) -> PacerResult<RateReport> {
    loop {
        match pacer.tick(clock.now_ms())? {
            TickOutcome::Stopped => break,
            TickOutcome::Drew | TickOutcome::Throttled | TickOutcome::Gated => {}
        }
        ticker.wait_next_frame();
    }
    Ok(RateReport::new(pacer.target_fps(), pacer.samples().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::pacer::PacerOpts;
    use std::rc::Rc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Advances a shared manual clock by a fixed step per "frame".
    struct SteppingTicker {
        clock: Rc<ManualClock>,
        step_ms: f64,
    }

    impl TickSource for SteppingTicker {
        fn wait_next_frame(&mut self) {
            self.clock.advance(self.step_ms);
        }
    }

    #[test]
    fn run_paces_draws_and_reports_per_second_counts() {
        // 20 fps against a 100 Hz simulated host; stop from inside the draw
        // action after 2.5 simulated seconds of successful draws.
        let mut pacer = FramePacer::configure(20.0, PacerOpts::default()).unwrap();
        let handle = pacer.handle();
        let draws = Arc::new(AtomicU32::new(0));
        let draws_in_action = Arc::clone(&draws);
        pacer.set_draw(move || {
            if draws_in_action.fetch_add(1, Ordering::Relaxed) + 1 == 50 {
                handle.stop();
            }
        });

        let clock = Rc::new(ManualClock::new(0.0));
        let mut ticker = SteppingTicker {
            clock: Rc::clone(&clock),
            step_ms: 10.0,
        };

        let report = run(&mut pacer, clock.as_ref(), &mut ticker).unwrap();
        assert_eq!(draws.load(Ordering::Relaxed), 50);
        assert_eq!(report.target_fps, 20.0);
        // 50 draws at 50 ms spacing span 2.5 seconds: two full buckets, the
        // partial third second is not reported.
        assert_eq!(report.samples, vec![20, 20]);
        assert_eq!(report.average_fps(), 20.0);
    }

    #[test]
    fn run_exits_immediately_on_a_stopped_pacer() {
        let mut pacer = FramePacer::configure(30.0, PacerOpts::default()).unwrap();
        pacer.set_draw(|| panic!("draw must not run after stop"));
        pacer.stop();

        let clock = Rc::new(ManualClock::new(0.0));
        let mut ticker = SteppingTicker {
            clock: Rc::clone(&clock),
            step_ms: 10.0,
        };
        let report = run(&mut pacer, clock.as_ref(), &mut ticker).unwrap();
        assert!(report.samples.is_empty());
    }

    #[test]
    fn sleep_ticker_clamps_zero_refresh() {
        // 0 Hz would divide by zero; the clamp pins it to one frame per second.
        let ticker = SleepTicker::with_refresh_hz(0);
        assert_eq!(ticker.period, Duration::from_secs(1));
    }
}
