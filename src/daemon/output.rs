//! Output formatting for the watch command.
//!
//! Notifications go to stdout, one line each, so the stream can be
//! piped. Status replies go to stderr alongside the logs.

use crate::bus::{NotificationEvent, NotificationSummary};
use crate::monitor::RunState;

/// Notification line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `text: ...` / `image: WxH`, with control characters escaped.
    Plain,
    /// One JSON object per line.
    Json,
}

/// Render a notification as a single line (no trailing newline).
pub fn format_notification(
    note: &NotificationEvent,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    let summary = note.summary();
    match format {
        OutputFormat::Json => serde_json::to_string(&summary),
        OutputFormat::Plain => Ok(match summary {
            NotificationSummary::Text { text } => format!("text: {}", escape(&text)),
            NotificationSummary::Image { width, height } => format!("image: {width}x{height}"),
        }),
    }
}

/// Render the `status` reply.
pub fn format_status(
    run_state: RunState,
    parked: bool,
    ignore_next: bool,
    auto_copy: bool,
) -> String {
    let state = match run_state {
        RunState::Running => "running",
        RunState::Paused if parked => "paused (parked)",
        RunState::Paused => "paused",
        RunState::Exited => "exited",
    };
    format!("state={state} ignore_next={ignore_next} auto_copy={auto_copy}")
}

/// Keep multi-line clipboard text on one output line.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
