//! X11 clipboard access via `xclip`.
//!
//! Fallback for X11 sessions where the native backend misbehaves. Every
//! read runs `xclip -selection clipboard -t TARGETS -o` first to learn
//! which flavors the current owner offers, then fetches text or a PNG
//! image. Synchronous (`std::process::Command`), since reads happen on
//! the monitor thread.

use std::ffi::OsString;
use std::io;
use std::process::{Command, Output, Stdio};

use super::{AccessError, ClipboardAccessor, ContentSnapshot, ImageContent, SetupError};

const TEXT_TARGETS: &[&str] = &[
    "UTF8_STRING",
    "text/plain;charset=utf-8",
    "STRING",
    "TEXT",
    "text/plain",
];
const IMAGE_TARGET: &str = "image/png";

/// Flavor picked from the clipboard owner's TARGETS list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Text(&'static str),
    Image,
}

/// `xclip`-backed implementation of [`ClipboardAccessor`].
#[derive(Debug)]
pub struct XclipAccessor {
    /// Program followed by any leading arguments.
    command: Vec<OsString>,
}

impl XclipAccessor {
    /// Attach to the X11 clipboard through `xclip`.
    ///
    /// # Errors
    ///
    /// `SetupError::ToolMissing` if `xclip` is not on `$PATH`,
    /// `SetupError::Unavailable` if it cannot reach the X display.
    pub fn connect() -> Result<Self, SetupError> {
        Self::connect_with(["xclip"])
    }

    /// Attach through an arbitrary xclip-compatible command.
    ///
    /// Runs one `TARGETS` query so that a missing X server is reported
    /// here rather than on every read. An empty clipboard also makes
    /// xclip exit non-zero; only a display failure is fatal.
    pub fn connect_with<I, S>(command: I) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let accessor = Self::with_command(command);
        let Some(program) = accessor.command.first() else {
            return Err(SetupError::Unavailable("empty xclip command".into()));
        };
        let program = program.to_string_lossy().into_owned();

        match accessor.run("TARGETS") {
            Ok(output) if !output.status.success() && is_display_error(&output.stderr) => {
                Err(SetupError::Unavailable(format!(
                    "{program} cannot open the X display: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                )))
            }
            Ok(_) => Ok(accessor),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SetupError::ToolMissing(program)),
            Err(e) => Err(SetupError::Unavailable(format!("failed to run {program}: {e}"))),
        }
    }

    /// Build an accessor around an arbitrary xclip-compatible command.
    pub fn with_command<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// Run xclip with `-selection clipboard -t <target> -o`.
    fn run(&self, target: &str) -> io::Result<Output> {
        let Some((program, leading)) = self.command.split_first() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty xclip command"));
        };

        Command::new(program)
            .args(leading)
            .args(["-selection", "clipboard", "-t", target, "-o"])
            .stdin(Stdio::null())
            .output()
    }

    /// Like [`run`](Self::run), but only a successful exit yields stdout.
    fn output(&self, target: &str) -> Result<Vec<u8>, AccessError> {
        let output = self.run(target).map_err(|e| match e.kind() {
            io::ErrorKind::Interrupted => AccessError::Interrupted,
            _ => AccessError::Transient(format!("failed to spawn xclip: {e}")),
        })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(AccessError::Transient(format!(
                "xclip -t {target} exited with status {}",
                output.status
            )))
        }
    }
}

impl ClipboardAccessor for XclipAccessor {
    fn read(&mut self) -> Result<ContentSnapshot, AccessError> {
        let targets = self.output("TARGETS")?;
        let flavor = pick_flavor(&String::from_utf8_lossy(&targets))
            .ok_or(AccessError::NoSupportedFlavor)?;

        match flavor {
            Flavor::Text(target) => {
                let bytes = self.output(target)?;
                let text = String::from_utf8(bytes).map_err(|_| {
                    AccessError::Transient(format!("{target} is not valid UTF-8"))
                })?;
                if text.is_empty() {
                    return Err(AccessError::NoSupportedFlavor);
                }
                Ok(ContentSnapshot::Text(text))
            }
            Flavor::Image => decode_png(&self.output(IMAGE_TARGET)?).map(ContentSnapshot::Image),
        }
    }

    fn name(&self) -> &'static str {
        "xclip"
    }
}

/// Choose a flavor from a newline-separated TARGETS listing.
///
/// Text wins over image when both are offered; among text targets the
/// order of [`TEXT_TARGETS`] decides.
fn pick_flavor(targets: &str) -> Option<Flavor> {
    let offered: Vec<&str> = targets.lines().map(str::trim).collect();

    TEXT_TARGETS
        .iter()
        .copied()
        .find(|t| offered.contains(t))
        .map(Flavor::Text)
        .or_else(|| offered.contains(&IMAGE_TARGET).then_some(Flavor::Image))
}

/// xclip prints "Error: Can't open display: ..." when no X server answers.
fn is_display_error(stderr: &[u8]) -> bool {
    String::from_utf8_lossy(stderr).contains("Can't open display")
}

fn decode_png(bytes: &[u8]) -> Result<ImageContent, AccessError> {
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| AccessError::Transient(format!("PNG decode failed: {e}")))?
        .to_rgba8();

    Ok(ImageContent {
        width: decoded.width() as usize,
        height: decoded.height() as usize,
        pixels: decoded.into_raw().into(),
    })
}
