//! Settings the monitor reads but does not own.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether processed results are copied back to the clipboard
/// automatically.
///
/// Read each time a processing cycle ends, so changes take effect on
/// the next cycle without restarting the monitor.
pub trait AutoCopySetting: Send + Sync {
    fn auto_copy_enabled(&self) -> bool;
}

impl AutoCopySetting for bool {
    fn auto_copy_enabled(&self) -> bool {
        *self
    }
}

/// Runtime-mutable boolean setting.
#[derive(Debug, Default)]
pub struct SharedFlag(AtomicBool);

impl SharedFlag {
    pub fn new(value: bool) -> Self {
        Self(AtomicBool::new(value))
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl AutoCopySetting for SharedFlag {
    fn auto_copy_enabled(&self) -> bool {
        self.get()
    }
}
