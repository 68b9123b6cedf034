//! Timing for command execution.

use std::time::{Duration, Instant};

use log::{debug, info};

/// Measures how long a named piece of work takes.
#[derive(Debug, Clone)]
pub struct Timer {
    name: String,
    start: Instant,
    /// Above this the timing is logged at info instead of debug
    slow_threshold: Option<Duration>,
}

impl Timer {
    pub fn new(name: impl Into<String>) -> Self {
        Timer {
            name: name.into(),
            start: Instant::now(),
            slow_threshold: None,
        }
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_slow(&self) -> bool {
        self.slow_threshold
            .map_or(false, |threshold| self.elapsed() > threshold)
    }

    /// Leaves `paused` out of the measurement, e.g. time spent waiting on the user.
    pub fn exclude(&mut self, paused: Duration) {
        self.start += paused;
    }

    pub fn log(&self, message: impl Into<String>) {
        let msg = format!("{} {}: {:?}", self.name, message.into(), self.elapsed());
        if self.is_slow() {
            info!("{} [SLOW]", msg);
        } else {
            debug!("{}", msg);
        }
    }
}

/// Formats a duration the way the interpreter reports it: seconds, three decimals.
pub fn format_duration(elapsed: Duration) -> String {
    format!("{:.3}s", elapsed.as_secs_f64())
}
