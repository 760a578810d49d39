//! Adaptive poll interval.
//!
//! Additive increase on failure, additive decrease on success, clamped
//! to `[min_wait, max_wait]` after every adjustment.

use std::time::Duration;

use super::config::MonitorConfig;

#[derive(Debug, Clone)]
pub struct Pacing {
    current: Duration,
    min: Duration,
    max: Duration,
    backoff_step: Duration,
    recovery_step: Duration,
}

impl Pacing {
    /// Start at `min_wait`. `config` must already be validated.
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            current: config.min_wait,
            min: config.min_wait,
            max: config.max_wait,
            backoff_step: config.backoff_step,
            recovery_step: config.recovery_step,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn on_failure(&mut self) {
        self.current = (self.current + self.backoff_step).min(self.max);
    }

    pub fn on_success(&mut self) {
        if self.current > self.min {
            self.current = self
                .current
                .saturating_sub(self.recovery_step)
                .max(self.min);
        }
    }
}
