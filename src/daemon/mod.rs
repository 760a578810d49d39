//! Watch daemon — owns the monitor and drives it from stdin and signals.
//!
//! Wires a clipboard backend, an [`EventBus`], and a
//! [`ClipboardMonitor`] together, then runs a `select!` loop over:
//! - notifications forwarded from the bus (printed to stdout),
//! - control commands read line by line from stdin,
//! - SIGTERM/SIGINT (graceful shutdown).
//!
//! On shutdown the monitor thread is joined on the blocking pool so a
//! clipboard read in flight cannot stall the runtime; notifications still
//! queued after the join are printed before returning.

mod commands;
pub mod output;

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;

use crate::bus::{BusEvent, ChannelSubscriber, EventBus, NotificationEvent};
use crate::clipboard::{self, AccessError, Backend, SetupError};
use crate::monitor::{ClipboardMonitor, MonitorConfig, MonitorError, MonitorParts};
use crate::settings::SharedFlag;

use commands::ControlCommand;
use output::OutputFormat;

/// Daemon errors.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("{0}")]
    Setup(#[from] SetupError),
    #[error("{0}")]
    Monitor(#[from] MonitorError),
    #[error("clipboard read failed: {0}")]
    Read(#[from] AccessError),
    #[error("output encoding failed: {0}")]
    Output(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Options for the `watch` command.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub backend: Backend,
    pub config: MonitorConfig,
    pub auto_copy: bool,
    pub format: OutputFormat,
}

/// Whether the control loop should keep going after a command.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Run the watch daemon until `exit`, SIGTERM, or SIGINT.
///
/// # Errors
///
/// Returns `DaemonError::Setup` if the clipboard backend cannot attach
/// (the only fatal clipboard condition), `DaemonError::Monitor` for an
/// invalid pacing config, and I/O errors from stdout or signal setup.
pub async fn run(opts: WatchOptions) -> Result<(), DaemonError> {
    let accessor = clipboard::connect(opts.backend)?;

    let bus = Arc::new(EventBus::new());
    let auto_copy = Arc::new(SharedFlag::new(opts.auto_copy));

    let (sink, mut notes) = ChannelSubscriber::new();
    let sink_id = bus.subscribe(Arc::new(sink));

    let monitor = ClipboardMonitor::spawn(
        MonitorParts {
            accessor,
            filter: None,
            bus: Arc::clone(&bus),
            auto_copy: auto_copy.clone(),
        },
        opts.config,
    )?;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    tracing::info!(
        backend = ?opts.backend,
        auto_copy = opts.auto_copy,
        "watching clipboard"
    );

    loop {
        tokio::select! {
            Some(note) = notes.recv() => {
                write_notification(&mut io::stdout().lock(), &note, opts.format)?;
            }

            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match commands::parse(&line) {
                    Ok(Some(cmd)) => {
                        if apply(cmd, &monitor, &bus, &auto_copy) == Flow::Exit {
                            tracing::info!("exit requested from stdin");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("clipwatchd: {e}"),
                },
                Ok(None) => {
                    // EOF is not an exit: the daemon may run detached.
                    tracing::debug!("stdin closed, control commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed, control commands disabled");
                    stdin_open = false;
                }
            },

            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM, shutting down");
                break;
            }

            _ = sigint.recv() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    let summary = tokio::task::spawn_blocking(move || monitor.join())
        .await
        .map_err(|_| MonitorError::Panicked)??;
    bus.unsubscribe(sink_id);

    let flushed = drain_pending(&mut notes, &mut io::stdout().lock(), opts.format)?;
    if flushed > 0 {
        tracing::debug!(flushed, "printed notifications queued at shutdown");
    }

    tracing::info!(
        reads = summary.reads,
        notifications = summary.notifications,
        ignored = summary.ignored,
        "watch stopped"
    );
    Ok(())
}

/// Read the clipboard once and print what is on it.
///
/// # Errors
///
/// `DaemonError::Setup` if the backend cannot attach,
/// `DaemonError::Read` if the single read fails.
pub fn probe(backend: Backend) -> Result<(), DaemonError> {
    let mut accessor = clipboard::connect(backend)?;
    let description = clipboard::probe(accessor.as_mut())?;
    println!("{description}");
    Ok(())
}

fn write_notification(
    out: &mut impl Write,
    note: &NotificationEvent,
    format: OutputFormat,
) -> Result<(), DaemonError> {
    writeln!(out, "{}", output::format_notification(note, format)?)?;
    out.flush()?;
    Ok(())
}

/// Print every notification still queued, returning how many there were.
fn drain_pending(
    notes: &mut mpsc::UnboundedReceiver<NotificationEvent>,
    out: &mut impl Write,
    format: OutputFormat,
) -> Result<usize, DaemonError> {
    let mut count = 0;
    while let Ok(note) = notes.try_recv() {
        write_notification(out, &note, format)?;
        count += 1;
    }
    Ok(count)
}

/// Apply one control command.
fn apply(
    cmd: ControlCommand,
    monitor: &ClipboardMonitor,
    bus: &EventBus,
    auto_copy: &SharedFlag,
) -> Flow {
    match cmd {
        ControlCommand::Pause => monitor.set_run(false),
        ControlCommand::Resume => monitor.set_run(true),
        ControlCommand::Start => bus.publish(&BusEvent::ProcessLifecycle { is_start: true }),
        ControlCommand::End => bus.publish(&BusEvent::ProcessLifecycle { is_start: false }),
        ControlCommand::Copied => bus.publish(&BusEvent::CopyTriggered),
        ControlCommand::AutoCopy(on) => {
            auto_copy.set(on);
            tracing::info!(auto_copy = on, "auto-copy setting changed");
        }
        ControlCommand::Status => eprintln!(
            "{}",
            output::format_status(
                monitor.run_state(),
                monitor.is_parked(),
                monitor.ignore_pending(),
                auto_copy.get(),
            )
        ),
        ControlCommand::Exit => return Flow::Exit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardAccessor, ContentSnapshot};
    use crate::monitor::RunState;

    struct Empty;

    impl ClipboardAccessor for Empty {
        fn read(&mut self) -> Result<ContentSnapshot, AccessError> {
            Err(AccessError::NoSupportedFlavor)
        }

        fn name(&self) -> &'static str {
            "empty"
        }
    }

    fn spawn_idle(bus: &Arc<EventBus>, auto_copy: &Arc<SharedFlag>) -> ClipboardMonitor {
        ClipboardMonitor::spawn(
            MonitorParts {
                accessor: Box::new(Empty),
                filter: None,
                bus: Arc::clone(bus),
                auto_copy: auto_copy.clone(),
            },
            MonitorConfig::from_millis(1, 10, 1, 1),
        )
        .unwrap()
    }

    #[test]
    fn commands_drive_monitor_state() {
        let bus = Arc::new(EventBus::new());
        let auto_copy = Arc::new(SharedFlag::new(false));
        let monitor = spawn_idle(&bus, &auto_copy);

        assert_eq!(apply(ControlCommand::Pause, &monitor, &bus, &auto_copy), Flow::Continue);
        assert_eq!(monitor.run_state(), RunState::Paused);

        apply(ControlCommand::Resume, &monitor, &bus, &auto_copy);
        assert_eq!(monitor.run_state(), RunState::Running);

        apply(ControlCommand::Start, &monitor, &bus, &auto_copy);
        assert_eq!(monitor.run_state(), RunState::Paused);

        apply(ControlCommand::AutoCopy(true), &monitor, &bus, &auto_copy);
        assert!(auto_copy.get());

        apply(ControlCommand::End, &monitor, &bus, &auto_copy);
        assert_eq!(monitor.run_state(), RunState::Running);
        assert!(monitor.ignore_pending());

        monitor.join().unwrap();
    }

    #[test]
    fn copied_arms_ignore() {
        let bus = Arc::new(EventBus::new());
        let auto_copy = Arc::new(SharedFlag::new(false));
        let monitor = spawn_idle(&bus, &auto_copy);

        apply(ControlCommand::Copied, &monitor, &bus, &auto_copy);
        assert!(monitor.ignore_pending());
        assert_eq!(monitor.run_state(), RunState::Running);

        monitor.join().unwrap();
    }

    #[test]
    fn queued_notifications_are_printed_at_shutdown() {
        let bus = EventBus::new();
        let (sink, mut notes) = ChannelSubscriber::new();
        bus.subscribe(Arc::new(sink));
        for text in ["late", "later"] {
            bus.publish(&BusEvent::Notification(NotificationEvent {
                content: ContentSnapshot::Text(text.into()),
            }));
        }

        let mut out = Vec::new();
        let flushed = drain_pending(&mut notes, &mut out, OutputFormat::Plain).unwrap();
        assert_eq!(flushed, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "text: late\ntext: later\n");

        let mut out = Vec::new();
        assert_eq!(drain_pending(&mut notes, &mut out, OutputFormat::Plain).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn exit_command_stops_loop() {
        let bus = Arc::new(EventBus::new());
        let auto_copy = Arc::new(SharedFlag::new(false));
        let monitor = spawn_idle(&bus, &auto_copy);

        assert_eq!(apply(ControlCommand::Exit, &monitor, &bus, &auto_copy), Flow::Exit);
        assert_eq!(apply(ControlCommand::Status, &monitor, &bus, &auto_copy), Flow::Continue);

        monitor.join().unwrap();
    }
}
