//! Clipboard access — content snapshots and pluggable backends.
//!
//! The monitor never talks to the OS clipboard directly. It holds a
//! [`ClipboardAccessor`] and asks it for the current content once per
//! poll cycle. Backends are chosen at startup via [`connect`].
//!
//! [`AccessError`] is what a single read can return and is always
//! recoverable. [`SetupError`] is what `connect` returns when there is
//! no clipboard to talk to at all.

mod native;
mod xclip;

use std::fmt;
use std::sync::Arc;

pub use self::native::ArboardAccessor;
pub use self::xclip::XclipAccessor;

/// Decoded image content (RGBA8, row-major).
///
/// `pixels` is shared so that the last-seen snapshot and an emitted
/// notification can hold the same buffer without copying it.
#[derive(Clone)]
pub struct ImageContent {
    pub width: usize,
    pub height: usize,
    pub pixels: Arc<[u8]>,
}

impl fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageContent")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Clipboard content observed by a single read.
#[derive(Debug, Clone)]
pub enum ContentSnapshot {
    Text(String),
    Image(ImageContent),
}

impl ContentSnapshot {
    /// Coarse equality used for change detection.
    ///
    /// Text compares by value. Images compare by dimensions only: a
    /// different picture with the same width and height is treated as
    /// unchanged. Text and image never match.
    pub fn same_content(&self, other: &ContentSnapshot) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Image(a), Self::Image(b)) => a.width == b.width && a.height == b.height,
            _ => false,
        }
    }

    /// Short human-readable description, used in logs and `probe`.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("text ({} chars)", text.chars().count()),
            Self::Image(img) => format!("image {}x{}", img.width, img.height),
        }
    }
}

/// A recoverable failure of a single clipboard read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Clipboard holds something that is neither text nor an image.
    #[error("no supported content flavor")]
    NoSupportedFlavor,
    /// OS-level transfer failure (clipboard busy, conversion error, ...).
    #[error("transient clipboard failure: {0}")]
    Transient(String),
    /// The read was interrupted before it completed.
    #[error("clipboard read interrupted")]
    Interrupted,
}

/// The clipboard subsystem cannot be reached at all.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("required tool not found: {0}")]
    ToolMissing(String),
}

/// Reads the current system clipboard content.
///
/// Implementations are moved onto the monitor thread, hence `Send`.
/// `read` takes `&mut self` because native handles are not required
/// to be shareable.
pub trait ClipboardAccessor: Send {
    /// Read the clipboard once.
    fn read(&mut self) -> Result<ContentSnapshot, AccessError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Available clipboard backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Native clipboard via the `arboard` crate.
    Arboard,
    /// X11 clipboard via the `xclip` command.
    Xclip,
}

/// Attach to the clipboard subsystem using the given backend.
///
/// # Errors
///
/// Returns `SetupError` if the backend cannot reach a clipboard at all
/// (no display, tool not installed).
pub fn connect(backend: Backend) -> Result<Box<dyn ClipboardAccessor>, SetupError> {
    let accessor: Box<dyn ClipboardAccessor> = match backend {
        Backend::Arboard => Box::new(ArboardAccessor::connect()?),
        Backend::Xclip => Box::new(XclipAccessor::connect()?),
    };
    tracing::info!(backend = accessor.name(), "clipboard backend attached");
    Ok(accessor)
}

/// Read the clipboard once and describe what is on it.
pub fn probe(accessor: &mut dyn ClipboardAccessor) -> Result<String, AccessError> {
    accessor.read().map(|content| content.describe())
}
