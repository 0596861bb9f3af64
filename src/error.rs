//! Error types for the capture runner

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing a page
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number of command-line arguments
    #[error("expected exactly two arguments: <url> <filename>")]
    Usage,

    /// The target could not be parsed as a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page never signalled load completion within the timeout
    #[error("Page {url} did not finish loading within {timeout_ms}ms")]
    NavigationHang { url: String, timeout_ms: u64 },

    /// Failed to launch the browser or open the page session
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load a URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Failed to execute JavaScript in the page
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The output path has no extension the backend can render to
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Failed to write the output file
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode or encode a thumbnail image
    #[error("Image processing failed: {0}")]
    ImageError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error stems from the invocation itself rather than the capture.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage | Error::InvalidUrl(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageError(err.to_string())
    }
}
