//! Poll pacing parameters.

use std::time::Duration;

/// Bounds and step sizes for the adaptive poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Shortest interval between reads; also the starting interval.
    pub min_wait: Duration,
    /// Longest interval between reads under sustained failure.
    pub max_wait: Duration,
    /// Added to the interval after a failed read.
    pub backoff_step: Duration,
    /// Subtracted from the interval after a successful read.
    pub recovery_step: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(3000),
            backoff_step: Duration::from_millis(100),
            recovery_step: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("min wait must be greater than zero")]
    ZeroMinWait,
    #[error("min wait ({min:?}) exceeds max wait ({max:?})")]
    InvertedBounds { min: Duration, max: Duration },
    #[error("{0} step must be greater than zero")]
    ZeroStep(&'static str),
}

impl MonitorConfig {
    /// Build a config from millisecond values, as given on the command line.
    pub fn from_millis(min: u64, max: u64, backoff: u64, recovery: u64) -> Self {
        Self {
            min_wait: Duration::from_millis(min),
            max_wait: Duration::from_millis(max),
            backoff_step: Duration::from_millis(backoff),
            recovery_step: Duration::from_millis(recovery),
        }
    }

    /// # Errors
    ///
    /// Rejects a zero `min_wait` (the loop would spin), `min_wait >
    /// max_wait`, and zero step sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_wait.is_zero() {
            return Err(ConfigError::ZeroMinWait);
        }
        if self.min_wait > self.max_wait {
            return Err(ConfigError::InvertedBounds {
                min: self.min_wait,
                max: self.max_wait,
            });
        }
        if self.backoff_step.is_zero() {
            return Err(ConfigError::ZeroStep("backoff"));
        }
        if self.recovery_step.is_zero() {
            return Err(ConfigError::ZeroStep("recovery"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg, MonitorConfig::from_millis(100, 3000, 100, 10));
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn equal_bounds_are_allowed() {
        assert_eq!(MonitorConfig::from_millis(50, 50, 1, 1).validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_min_wait() {
        assert_eq!(
            MonitorConfig::from_millis(0, 100, 10, 10).validate(),
            Err(ConfigError::ZeroMinWait)
        );
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            MonitorConfig::from_millis(500, 100, 10, 10).validate(),
            Err(ConfigError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn rejects_zero_steps() {
        assert_eq!(
            MonitorConfig::from_millis(100, 3000, 0, 10).validate(),
            Err(ConfigError::ZeroStep("backoff"))
        );
        assert_eq!(
            MonitorConfig::from_millis(100, 3000, 100, 0).validate(),
            Err(ConfigError::ZeroStep("recovery"))
        );
    }
}
