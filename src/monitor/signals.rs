//! Bus subscriber turning control signals into monitor state changes.

use std::sync::Arc;

use crate::bus::{BusEvent, Subscriber};
use crate::settings::AutoCopySetting;

use super::control::Control;

/// Reacts to processing-cycle and copy-trigger signals.
///
/// - cycle start: pause, so the content being processed does not fire
///   again.
/// - cycle end: if auto-copy is on, arm ignore-once first (the result is
///   about to land on the clipboard), then resume.
/// - copy trigger: arm ignore-once; run state untouched.
pub struct ControlSignals {
    control: Arc<Control>,
    auto_copy: Arc<dyn AutoCopySetting>,
}

impl ControlSignals {
    pub fn new(control: Arc<Control>, auto_copy: Arc<dyn AutoCopySetting>) -> Self {
        Self { control, auto_copy }
    }
}

impl Subscriber for ControlSignals {
    fn on_event(&self, event: &BusEvent) {
        match event {
            BusEvent::ProcessLifecycle { is_start: true } => {
                tracing::debug!("processing started, pausing monitor");
                self.control.pause();
            }
            BusEvent::ProcessLifecycle { is_start: false } => {
                let auto_copy = self.auto_copy.auto_copy_enabled();
                if auto_copy {
                    self.control.arm_ignore();
                }
                tracing::debug!(auto_copy, "processing finished, resuming monitor");
                self.control.resume();
            }
            BusEvent::CopyTriggered => {
                tracing::debug!("copy triggered, ignoring next change");
                self.control.arm_ignore();
            }
            BusEvent::Notification(_) => {}
        }
    }
}
