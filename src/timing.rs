//! Stage timing for pipeline diagnostics.

use std::time::{Duration, Instant};

/// Measures one pipeline stage and prints its duration when done.
pub struct StageTimer {
    label: &'static str,
    started: Instant,
}

impl StageTimer {
    /// Start timing the named stage.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }

    /// Print the elapsed time and return it for aggregation.
    pub fn done(self) -> Duration {
        let elapsed = self.started.elapsed();
        println!("  [{:.1}s] {}", elapsed.as_secs_f64(), self.label);
        elapsed
    }
}
