//! Simulation progress model.
//!
//! No simulator is driven yet: a run is a ticking progress counter that
//! advances by a random positive step every tick until it reaches 100, then
//! produces a summary. The random source is a `StdRng`, seeded from the
//! configuration when a seed is set so runs are reproducible.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::SimulationConfig;

/// Progress value at which a run is complete.
pub const COMPLETE: u8 = 100;

/// Name of the test reported by the failure-detail log entry.
const FAILING_TEST: &str = "Register file access";

/// Outcome of a finished simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Number of passing tests
    pub passed: u32,
    /// Number of failing tests
    pub failed: u32,
    /// Extra detail about a failing test, when one was singled out
    pub failure_detail: Option<String>,
}

impl SimulationReport {
    /// One-line summary for the project log.
    pub fn summary(&self) -> String {
        format!("Simulation complete. {} passed, {} failed.", self.passed, self.failed)
    }
}

/// Random-walk progress counter for one run.
#[derive(Debug)]
pub struct ProgressTicker {
    rng: StdRng,
    progress: u8,
    max_increment: u8,
}

impl ProgressTicker {
    /// Create a ticker at 0%.
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, progress: 0, max_increment: config.max_increment.clamp(1, COMPLETE) }
    }

    /// Current progress.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the run reached 100%.
    pub fn is_finished(&self) -> bool {
        self.progress >= COMPLETE
    }

    /// Advance by one tick. Returns the new progress, or `None` once finished.
    pub fn tick(&mut self) -> Option<u8> {
        if self.is_finished() {
            return None;
        }
        let step = self.rng.gen_range(1..=self.max_increment);
        self.progress = self.progress.saturating_add(step).min(COMPLETE);
        Some(self.progress)
    }

    /// Build the report of a finished run.
    pub fn finish(mut self, config: &SimulationConfig) -> SimulationReport {
        let probability = config.failure_detail_probability;
        let probability = if probability.is_finite() { probability.clamp(0.0, 1.0) } else { 0.0 };
        let failure_detail = self
            .rng
            .gen_bool(probability)
            .then(|| format!("Test '{}' FAILED. See report for details.", FAILING_TEST));

        SimulationReport { passed: config.passed, failed: config.failed, failure_detail }
    }
}

/// Run the tick loop to completion, reporting every progress value.
///
/// Ticks are spaced by `tick_interval`; after the value 100 is reported the
/// loop stops, waits `finalize_delay`, and returns the report.
pub async fn run<F>(config: SimulationConfig, mut on_progress: F) -> SimulationReport
where
    F: FnMut(u8),
{
    let period = Duration::from_millis(config.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let mut ticker = ProgressTicker::new(&config);

    loop {
        interval.tick().await;
        let Some(progress) = ticker.tick() else { break };
        on_progress(progress);
        if ticker.is_finished() {
            break;
        }
    }

    tokio::time::sleep(Duration::from_millis(config.finalize_delay_ms)).await;
    ticker.finish(&config)
}
