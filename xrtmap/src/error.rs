//! Error types for the map session.
//!
//! Two families exist:
//!
//! - [`MapError`] is fatal. Components return it and the binary turns it into
//!   a one-line diagnostic and a non-zero exit status.
//! - [`InputError`](crate::input::InputError) is recoverable. A malformed
//!   control line is logged and the session keeps serving input.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate the map session.
#[derive(Debug, Error)]
pub enum MapError {
    /// The backing image could not be opened or decoded.
    #[error("{}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The backing image decoded to zero pixels.
    #[error("{}: image has no pixels ({width}×{height})", path.display())]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// The control channel reached end of input.
    #[error("read: control channel closed")]
    ControlClosed,

    /// Reading from the control channel failed.
    #[error("read: {0}")]
    ControlRead(#[from] std::io::Error),

    /// The display provider failed or could not be reached.
    #[error("display: {0}")]
    Display(String),

    /// Invalid session configuration.
    #[error("configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_closed_display() {
        assert_eq!(
            MapError::ControlClosed.to_string(),
            "read: control channel closed"
        );
    }

    #[test]
    fn test_empty_image_display() {
        let err = MapError::EmptyImage {
            path: PathBuf::from("world.png"),
            width: 0,
            height: 180,
        };
        assert_eq!(err.to_string(), "world.png: image has no pixels (0×180)");
    }

    #[test]
    fn test_control_read_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe gone");
        let err: MapError = io.into();
        assert!(matches!(err, MapError::ControlRead(_)));
        assert!(err.to_string().contains("pipe gone"));
    }

    #[test]
    fn test_config_display() {
        let err = MapError::Config("marker size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "configuration: marker size must be positive"
        );
    }
}
