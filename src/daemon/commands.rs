//! Line-oriented control commands read from stdin.
//!
//! One command per line, case-insensitive, surrounding whitespace
//! ignored. Blank lines parse to `None`.

/// A control command for the running daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Manual pause (`set_run(false)`).
    Pause,
    /// Manual resume (`set_run(true)`).
    Resume,
    /// Publish a processing-cycle start signal.
    Start,
    /// Publish a processing-cycle end signal.
    End,
    /// Publish a copy-trigger signal.
    Copied,
    /// Flip the auto-copy setting.
    AutoCopy(bool),
    /// Print monitor state to stderr.
    Status,
    /// Stop the daemon.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Option<ControlCommand>, ParseError> {
    let lowered = line.trim().to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let no_arg = |cmd: ControlCommand, name: &'static str| match arg {
        None => Ok(Some(cmd)),
        Some(_) => Err(ParseError::BadArgument {
            command: name,
            expected: "no arguments",
        }),
    };

    match head {
        "pause" => no_arg(ControlCommand::Pause, "pause"),
        "resume" => no_arg(ControlCommand::Resume, "resume"),
        "start" => no_arg(ControlCommand::Start, "start"),
        "end" => no_arg(ControlCommand::End, "end"),
        "copied" => no_arg(ControlCommand::Copied, "copied"),
        "status" => no_arg(ControlCommand::Status, "status"),
        "exit" | "quit" => no_arg(ControlCommand::Exit, "exit"),
        "auto-copy" => match (arg, words.next()) {
            (Some("on"), None) => Ok(Some(ControlCommand::AutoCopy(true))),
            (Some("off"), None) => Ok(Some(ControlCommand::AutoCopy(false))),
            _ => Err(ParseError::BadArgument {
                command: "auto-copy",
                expected: "`on` or `off`",
            }),
        },
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
