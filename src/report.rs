/// Post-hoc rate report: what a pacer actually achieved, second by second.
///
/// Produced by [`crate::driver::run`] once the pacer stops; serializable for
/// diagnostic output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RateReport {
    /// Configured target rate in frames per second.
    pub target_fps: f64,
    /// Completed-draw count for each full wall-clock second, in order.
    pub samples: Vec<u32>,
}

impl RateReport {
    pub fn new(target_fps: f64, samples: Vec<u32>) -> Self {
        Self {
            target_fps,
            samples,
        }
    }

    /// Number of full seconds observed.
    pub fn seconds(&self) -> usize {
        self.samples.len()
    }

    /// Average achieved rate over the observed full seconds, or 0 when no
    /// full second completed.
    pub fn average_fps(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: u64 = self.samples.iter().map(|&n| u64::from(n)).sum();
        total as f64 / self.samples.len() as f64
    }
}
