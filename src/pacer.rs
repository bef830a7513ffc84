use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{PacerError, PacerResult};

/// A tick whose elapsed time lands within this slack of a full interval is
/// due. f64 rounding of `1000 / fps` must not push an on-the-dot tick past
/// the boundary.
const DUE_SLACK_MS: f64 = 1e-6;

/// Options controlling pacing behavior beyond the target rate.
#[derive(Clone, Copy, Debug)]
pub struct PacerOpts {
    /// Withhold draw invocations until an external producer signals readiness
    /// via [`PacerHandle::unblock`]. Caps in-flight work to one outstanding
    /// frame.
    pub backpressure: bool,
}

impl Default for PacerOpts {
    fn default() -> Self {
        Self {
            backpressure: false,
        }
    }
}

/// What a single tick decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The draw action ran.
    Drew,
    /// The minimum interval since the last draw has not elapsed.
    Throttled,
    /// Backpressure is enabled and no producer signal has arrived.
    Gated,
    /// The pacer is stopped; no further ticks should be driven.
    Stopped,
}

/// Cloneable, thread-safe control surface for a [`FramePacer`].
///
/// External producers (a worker signaling render completion, a media source
/// reaching end-of-stream) hold one of these: setting the gate or the stop
/// flag is order-independent with respect to a concurrently executing tick.
#[derive(Clone, Debug)]
pub struct PacerHandle {
    running: Arc<AtomicBool>,
    gate: Arc<AtomicBool>,
    backpressure: bool,
}

impl PacerHandle {
    /// Permanently stop the pacer. Idempotent; a pending tick observes the
    /// flag and exits without invoking the draw action.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::debug!("stop requested");
        }
    }

    /// Open the gate, permitting the next due tick to draw. No-op when
    /// backpressure is disabled.
    pub fn unblock(&self) {
        if self.backpressure {
            tracing::trace!("producer unblock signal");
            self.gate.store(true, Ordering::Release);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Frame-rate governor: invokes a caller-supplied draw action at
/// approximately the configured rate, never faster, optionally gated on a
/// producer-ready signal.
///
/// The pacer owns no loop of its own: the host drives [`FramePacer::tick`]
/// once per drawing opportunity (see [`crate::driver::run`] for the stock
/// loop). All pacing state is owned by the instance, so independent pacers
/// coexist without interference.
pub struct FramePacer {
    target_fps: f64,
    interval_ms: f64,
    backpressure: bool,
    running: Arc<AtomicBool>,
    gate: Arc<AtomicBool>,
    draw: Option<Box<dyn FnMut() + Send>>,
    /// Armed by the first driven tick; also the zero point for sample buckets.
    anchor_ms: Option<f64>,
    last_tick_ms: f64,
    seconds: u64,
    count: u32,
    samples: Vec<u32>,
    missing_logged: bool,
}

impl std::fmt::Debug for FramePacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePacer")
            .field("target_fps", &self.target_fps)
            .field("interval_ms", &self.interval_ms)
            .field("backpressure", &self.backpressure)
            .field("anchor_ms", &self.anchor_ms)
            .field("last_tick_ms", &self.last_tick_ms)
            .field("seconds", &self.seconds)
            .field("count", &self.count)
            .field("samples", &self.samples)
            .field("missing_logged", &self.missing_logged)
            .finish_non_exhaustive()
    }
}

impl FramePacer {
    /// Construct a pacer targeting `target_fps` draw invocations per second.
    ///
    /// Rejects non-positive and non-finite rates.
    pub fn configure(target_fps: f64, opts: PacerOpts) -> PacerResult<Self> {
        if !target_fps.is_finite() || target_fps <= 0.0 {
            return Err(PacerError::invalid_config(format!(
                "target fps must be a positive finite number, got {target_fps}"
            )));
        }

        Ok(Self {
            target_fps,
            interval_ms: 1000.0 / target_fps,
            backpressure: opts.backpressure,
            running: Arc::new(AtomicBool::new(true)),
            gate: Arc::new(AtomicBool::new(false)),
            draw: None,
            anchor_ms: None,
            last_tick_ms: 0.0,
            seconds: 0,
            count: 0,
            samples: Vec::new(),
            missing_logged: false,
        })
    }

    /// Store the draw action invoked on each successful tick.
    ///
    /// May be called before or after ticking begins; a due tick with no
    /// action stored fails with [`PacerError::MissingCallback`] instead of
    /// ticking silently forever.
    pub fn set_draw(&mut self, draw: impl FnMut() + Send + 'static) {
        self.draw = Some(Box::new(draw));
    }

    /// One per-frame pacing decision. `now_ms` must come from a monotonic
    /// clock; the first driven tick arms the pacer's phase and sample anchor.
    ///
    /// Ticks never overlap: the host calls this from a single loop, so no
    /// locking is needed beyond the stop/gate atomics.
    pub fn tick(&mut self, now_ms: f64) -> PacerResult<TickOutcome> {
        if !self.running.load(Ordering::Acquire) {
            return Ok(TickOutcome::Stopped);
        }

        let anchor = match self.anchor_ms {
            Some(anchor) => anchor,
            None => {
                self.anchor_ms = Some(now_ms);
                self.last_tick_ms = now_ms;
                now_ms
            }
        };

        let elapsed = now_ms - self.last_tick_ms;
        if elapsed < self.interval_ms - DUE_SLACK_MS {
            tracing::trace!(elapsed_ms = elapsed, "tick throttled");
            return Ok(TickOutcome::Throttled);
        }

        // Checked here, consumed only once the tick is certain to draw.
        if self.backpressure && !self.gate.load(Ordering::Acquire) {
            tracing::trace!("tick gated: producer not ready");
            return Ok(TickOutcome::Gated);
        }

        if self.draw.is_none() {
            if !self.missing_logged {
                self.missing_logged = true;
                tracing::error!("due tick fired with no draw action set");
            }
            return Err(PacerError::missing_callback(
                "no draw action supplied before the first due tick",
            ));
        }

        // Phase-preserving correction: keep the fire grid anchored instead of
        // resetting to `now`, so host jitter does not drift the average rate.
        // A remainder within the slack of a full interval is a boundary fire;
        // snap to `now` so the next tick is not immediately due again.
        let mut rem = elapsed % self.interval_ms;
        if self.interval_ms - rem <= DUE_SLACK_MS {
            rem = 0.0;
        }
        self.last_tick_ms = now_ms - rem;

        self.count += 1;
        if now_ms - anchor >= ((self.seconds + 1) as f64) * 1000.0 {
            self.seconds += 1;
            self.samples.push(self.count);
            self.count = 0;
        }

        if self.backpressure {
            self.gate.swap(false, Ordering::AcqRel);
        }

        if let Some(draw) = self.draw.as_mut() {
            draw();
        }
        Ok(TickOutcome::Drew)
    }

    /// Permanently stop the pacer. Idempotent; `samples` is final afterwards.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::info!(samples = ?self.samples, "pacer stopped");
        }
    }

    /// Open the backpressure gate. No-op when backpressure is disabled.
    pub fn unblock(&self) {
        if self.backpressure {
            tracing::trace!("producer unblock signal");
            self.gate.store(true, Ordering::Release);
        }
    }

    /// Control surface usable from other threads.
    pub fn handle(&self) -> PacerHandle {
        PacerHandle {
            running: Arc::clone(&self.running),
            gate: Arc::clone(&self.gate),
            backpressure: self.backpressure,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn target_fps(&self) -> f64 {
        self.target_fps
    }

    /// Minimum spacing between draw invocations, in milliseconds.
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Per-second completed-tick counts, one entry per full second since the
    /// first driven tick. The current partial second is not included.
    pub fn samples(&self) -> &[u32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u32> {
        self.samples
    }
}
