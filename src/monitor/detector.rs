//! Change detection against the last-seen snapshot.

use std::time::Duration;

use crate::clipboard::{AccessError, ContentSnapshot};

use super::config::MonitorConfig;
use super::pacing::Pacing;

/// Result of feeding one read into the detector.
#[derive(Debug)]
pub enum Observation {
    /// The read failed; the interval has backed off.
    Failed(AccessError),
    /// Same content as last time (coarse equality).
    Unchanged,
    /// New content. It is already recorded as last-seen.
    Changed(ContentSnapshot),
}

/// Owns the last-seen snapshot and the poll interval. Only the monitor
/// thread touches it.
#[derive(Debug)]
pub struct Detector {
    last: Option<ContentSnapshot>,
    pacing: Pacing,
}

impl Detector {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            last: None,
            pacing: Pacing::new(config),
        }
    }

    /// Interval to wait before the next read.
    pub fn wait_interval(&self) -> Duration {
        self.pacing.current()
    }

    pub fn observe(&mut self, read: Result<ContentSnapshot, AccessError>) -> Observation {
        let content = match read {
            Ok(content) => content,
            Err(e) => {
                self.pacing.on_failure();
                return Observation::Failed(e);
            }
        };
        self.pacing.on_success();

        if self
            .last
            .as_ref()
            .is_some_and(|last| last.same_content(&content))
        {
            return Observation::Unchanged;
        }

        self.last = Some(content.clone());
        Observation::Changed(content)
    }
}
