//! Native clipboard access via `arboard`.
//!
//! A fresh `arboard::Clipboard` handle is opened for every read so the
//! accessor itself holds no platform state and is trivially `Send`.

use arboard::Clipboard;

use super::{AccessError, ClipboardAccessor, ContentSnapshot, ImageContent, SetupError};

/// `arboard`-backed implementation of [`ClipboardAccessor`].
#[derive(Debug)]
pub struct ArboardAccessor;

impl ArboardAccessor {
    /// Open the clipboard once to check that it is reachable.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Unavailable` if no clipboard can be opened
    /// (e.g. no display server).
    pub fn connect() -> Result<Self, SetupError> {
        Clipboard::new().map_err(|e| SetupError::Unavailable(e.to_string()))?;
        Ok(Self)
    }
}

impl ClipboardAccessor for ArboardAccessor {
    fn read(&mut self) -> Result<ContentSnapshot, AccessError> {
        let mut clipboard = Clipboard::new().map_err(map_error)?;

        // Text first, then image.
        match clipboard.get_text() {
            Ok(text) if !text.is_empty() => return Ok(ContentSnapshot::Text(text)),
            Ok(_) | Err(arboard::Error::ContentNotAvailable) => {}
            Err(e) => return Err(map_error(e)),
        }

        let image = clipboard.get_image().map_err(map_error)?;
        Ok(ContentSnapshot::Image(ImageContent {
            width: image.width,
            height: image.height,
            pixels: image.bytes.into_owned().into(),
        }))
    }

    fn name(&self) -> &'static str {
        "arboard"
    }
}

fn map_error(e: arboard::Error) -> AccessError {
    match e {
        arboard::Error::ContentNotAvailable => AccessError::NoSupportedFlavor,
        arboard::Error::ClipboardOccupied => AccessError::Transient("clipboard occupied".into()),
        other => AccessError::Transient(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_not_available_is_unsupported_flavor() {
        assert_eq!(
            map_error(arboard::Error::ContentNotAvailable),
            AccessError::NoSupportedFlavor
        );
    }

    #[test]
    fn occupied_is_transient() {
        assert!(matches!(
            map_error(arboard::Error::ClipboardOccupied),
            AccessError::Transient(_)
        ));
    }

    #[test]
    fn unknown_error_keeps_description() {
        let err = map_error(arboard::Error::Unknown {
            description: "selection owner vanished".into(),
        });
        match err {
            AccessError::Transient(msg) => assert!(msg.contains("selection owner vanished")),
            other => panic!("expected Transient, got {other:?}"),
        }
    }
}
