//! Framepacer is a frame-rate governor for cooperative render loops.
//!
//! A [`FramePacer`] is driven once per host drawing opportunity and decides,
//! on each tick, whether the caller's draw action runs. It keeps the long-run
//! invocation rate at a configured target (never faster), and can optionally
//! withhold invocation until an upstream producer signals that new data is
//! ready, capping in-flight work to one outstanding frame.
//!
//! # Loop overview
//!
//! 1. **Configure**: `target_fps + PacerOpts -> FramePacer`
//! 2. **Tick**: `now_ms -> TickOutcome` (throttle, gate, or invoke the draw action)
//! 3. **Signal**: a [`PacerHandle`] lets external producers `unblock()` or `stop()`
//! 4. **Report**: per-second completed-tick counts collect into a [`RateReport`]
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Phase-preserving pacing**: a delayed tick corrects by the remainder of
//!   its overshoot instead of resetting to `now`, so host jitter does not
//!   drift the effective rate downward.
//! - **Single-threaded ticks**: a tick never overlaps another tick; the only
//!   cross-thread traffic is the stop flag and the backpressure gate, both
//!   plain atomics.
//!
//! Rendering, media decode, and worker transport are external collaborators:
//! the pacer only needs a clock ([`Clock`]), a next-frame wait ([`TickSource`]),
//! and an opaque draw action.
#![forbid(unsafe_code)]

pub mod clock;
pub mod driver;
pub mod error;
pub mod pacer;
pub mod report;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::{SleepTicker, TickSource, run};
pub use error::{PacerError, PacerResult};
pub use pacer::{FramePacer, PacerHandle, PacerOpts, TickOutcome};
pub use report::RateReport;
