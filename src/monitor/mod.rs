//! Clipboard monitor — background polling thread with pause/resume and
//! ignore-once control.
//!
//! A dedicated thread (`clipboard-monitor`) sleeps for the current poll
//! interval, blocks while paused, reads the clipboard, and publishes a
//! [`BusEvent::Notification`] for every change that survives the
//! ignore-once flag and the process filter. Read failures never stop
//! the loop; they only stretch the interval (see [`pacing`]).
//!
//! Control arrives two ways: directly through [`ClipboardMonitor`]
//! (`pause`/`resume`/`set_run`/`request_exit`) and through bus signals
//! handled by [`signals::ControlSignals`]. Both funnel into the same
//! [`control::Control`].

pub mod config;
pub mod control;
mod detector;
mod pacing;
mod signals;

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::bus::{BusEvent, EventBus, NotificationEvent, SubscriptionId};
use crate::clipboard::ClipboardAccessor;
use crate::filter::{self, ProcessFilter};
use crate::settings::AutoCopySetting;

pub use config::{ConfigError, MonitorConfig};
pub use control::RunState;
use control::Control;
use detector::{Detector, Observation};
use signals::ControlSignals;

/// Monitor startup/teardown errors.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to spawn monitor thread: {0}")]
    Spawn(io::Error),
    #[error("monitor thread panicked")]
    Panicked,
}

/// Collaborators injected into the monitor.
pub struct MonitorParts {
    pub accessor: Box<dyn ClipboardAccessor>,
    /// `None` never suppresses.
    pub filter: Option<Arc<dyn ProcessFilter>>,
    pub bus: Arc<EventBus>,
    pub auto_copy: Arc<dyn AutoCopySetting>,
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub reads: u64,
    pub failures: u64,
    pub notifications: u64,
    pub ignored: u64,
    pub suppressed: u64,
}

/// Handle to a running monitor thread.
///
/// Dropping the handle requests exit without waiting; use
/// [`join`](Self::join) to wait for teardown.
pub struct ClipboardMonitor {
    control: Arc<Control>,
    thread: Option<JoinHandle<LoopSummary>>,
}

impl ClipboardMonitor {
    /// Validate `config`, subscribe to control signals, and start the
    /// polling thread.
    ///
    /// # Errors
    ///
    /// `MonitorError::Config` for invalid pacing bounds,
    /// `MonitorError::Spawn` if the OS refuses a new thread.
    pub fn spawn(parts: MonitorParts, config: MonitorConfig) -> Result<Self, MonitorError> {
        config.validate()?;

        let control = Arc::new(Control::new());
        let subscription = parts.bus.subscribe(Arc::new(ControlSignals::new(
            Arc::clone(&control),
            parts.auto_copy,
        )));

        let bus = Arc::clone(&parts.bus);
        let poller = Poller {
            accessor: parts.accessor,
            filter: parts.filter,
            bus: parts.bus,
            control: Arc::clone(&control),
            subscription,
            detector: Detector::new(&config),
            config,
        };

        let thread = thread::Builder::new()
            .name("clipboard-monitor".into())
            .spawn(move || poller.run())
            .map_err(|e| {
                bus.unsubscribe(subscription);
                MonitorError::Spawn(e)
            })?;

        Ok(Self {
            control,
            thread: Some(thread),
        })
    }

    // The daemon drives pause/resume through `set_run`.
    #[allow(dead_code)]
    pub fn pause(&self) {
        self.control.pause();
    }

    #[allow(dead_code)]
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Imperative run/pause toggle: `true` resumes, `false` pauses.
    pub fn set_run(&self, run: bool) {
        self.control.set_run(run);
    }

    /// Ask the thread to stop. It finishes its current read (if any),
    /// unsubscribes from the bus, and exits.
    pub fn request_exit(&self) {
        self.control.request_exit();
    }

    pub fn run_state(&self) -> RunState {
        self.control.run_state()
    }

    pub fn ignore_pending(&self) -> bool {
        self.control.ignore_pending()
    }

    /// Whether the thread is currently blocked in the paused wait.
    pub fn is_parked(&self) -> bool {
        self.control.is_parked()
    }

    /// Request exit and wait for the thread to finish.
    ///
    /// # Errors
    ///
    /// `MonitorError::Panicked` if the polling thread panicked.
    pub fn join(mut self) -> Result<LoopSummary, MonitorError> {
        self.control.request_exit();
        match self.thread.take() {
            Some(handle) => handle.join().map_err(|_| MonitorError::Panicked),
            None => Ok(LoopSummary::default()),
        }
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        self.control.request_exit();
    }
}

/// State owned by the polling thread.
struct Poller {
    accessor: Box<dyn ClipboardAccessor>,
    filter: Option<Arc<dyn ProcessFilter>>,
    bus: Arc<EventBus>,
    control: Arc<Control>,
    subscription: SubscriptionId,
    detector: Detector,
    config: MonitorConfig,
}

impl Poller {
    fn run(mut self) -> LoopSummary {
        tracing::info!(
            backend = self.accessor.name(),
            min_wait_ms = self.config.min_wait.as_millis() as u64,
            max_wait_ms = self.config.max_wait.as_millis() as u64,
            "clipboard monitor started"
        );

        let mut summary = LoopSummary::default();

        loop {
            if self.control.sleep(self.detector.wait_interval()) == RunState::Exited {
                break;
            }
            if self.control.wait_while_paused() == RunState::Exited {
                break;
            }

            let epoch = self.control.epoch();
            let read = self.accessor.read();
            summary.reads += 1;

            // A pause that landed while the read was in flight drops the
            // result, so the change is picked up after resume instead.
            let detector = &mut self.detector;
            let Some((observation, ignored)) = self.control.settle(epoch, |ignore_next| {
                let observation = detector.observe(read);
                let ignored =
                    matches!(observation, Observation::Changed(_)) && std::mem::take(ignore_next);
                (observation, ignored)
            }) else {
                continue;
            };

            match observation {
                Observation::Failed(e) => {
                    summary.failures += 1;
                    tracing::warn!(
                        error = %e,
                        wait_ms = self.detector.wait_interval().as_millis() as u64,
                        "clipboard read failed"
                    );
                }
                Observation::Unchanged => {}
                Observation::Changed(content) => {
                    if ignored {
                        summary.ignored += 1;
                        tracing::debug!(content = %content.describe(), "change ignored once");
                        continue;
                    }
                    if filter::suppresses(self.filter.as_deref()) {
                        summary.suppressed += 1;
                        tracing::debug!(
                            content = %content.describe(),
                            "change suppressed by filter"
                        );
                        continue;
                    }
                    summary.notifications += 1;
                    tracing::debug!(content = %content.describe(), "clipboard changed");
                    self.bus
                        .publish(&BusEvent::Notification(NotificationEvent { content }));
                }
            }
        }

        self.bus.unsubscribe(self.subscription);
        tracing::info!(
            reads = summary.reads,
            failures = summary.failures,
            notifications = summary.notifications,
            ignored = summary.ignored,
            suppressed = summary.suppressed,
            "clipboard monitor exited"
        );
        summary
    }
}
