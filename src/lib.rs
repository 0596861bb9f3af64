//! Webshot
//!
//! Single-shot web page capture: open one URL in a headless browser, force an
//! opaque white body background, and write a rendering of a fixed viewport to
//! a file.
//!
//! # Features
//!
//! - **CDP Backend** (default): Uses Chrome DevTools Protocol via headless Chrome
//! - **Bounded load wait**: navigation that never completes fails with
//!   [`Error::NavigationHang`] instead of blocking forever
//! - **Scoped sessions**: the page session is released on every exit path
//!
//! # Example
//!
//! ```no_run
//! use webshot::{CaptureConfig, Invocation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let invocation = Invocation::new("https://example.com/", "out.png")?;
//! let report = webshot::runner::capture(&invocation, &CaptureConfig::default())?;
//! println!("wrote {} bytes", report.bytes_written);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub mod error;
pub use error::{Error, Result};

pub mod format;
pub use format::OutputFormat;

pub mod style;

pub mod runner;

pub mod thumbnail;

#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly capture (worker-thread backed)
pub mod async_api;

/// Configuration for a capture run
///
/// The defaults reproduce the classic capture: a 1152×648 viewport, a clip
/// region covering exactly that viewport, a white body background and a
/// 30 second bound on the page load.
///
/// # Examples
///
/// ```
/// let cfg = webshot::CaptureConfig::default();
/// assert_eq!(cfg.viewport.width, 1152);
/// assert_eq!(cfg.clip.height, cfg.viewport.height);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Viewport dimensions used for layout
    pub viewport: Viewport,
    /// Region of the rendered page written to the output
    pub clip: ClipRect,
    /// Upper bound on the wait for the load-completion signal, in milliseconds
    pub load_timeout_ms: u64,
    /// Stylesheet injected as the first child of `<head>` before rendering
    pub background_css: String,
    /// JPEG quality (0-100); `None` keeps the backend default
    pub jpeg_quality: Option<u32>,
    /// Explicit browser binary; `None` lets the backend locate one
    pub chrome_path: Option<PathBuf>,
    /// Whether to keep the browser's process sandbox enabled
    pub sandbox: bool,
}

impl CaptureConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            viewport,
            clip: ClipRect::from(viewport),
            load_timeout_ms: 30000,
            background_css: style::WHITE_BACKGROUND_CSS.to_string(),
            jpeg_quality: None,
            chrome_path: None,
            sandbox: true,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1152,
            height: 648,
        }
    }
}

/// Rectangular region of the page, in CSS pixels, that ends up in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<Viewport> for ClipRect {
    fn from(v: Viewport) -> Self {
        Self {
            x: 0,
            y: 0,
            width: v.width,
            height: v.height,
        }
    }
}

/// Validated invocation parameters: what to load and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub url: Url,
    pub output_path: PathBuf,
}

impl Invocation {
    /// Build an invocation, rejecting empty arguments and unparsable URLs.
    pub fn new(url: &str, output_path: impl Into<PathBuf>) -> Result<Self> {
        let output_path = output_path.into();
        if url.trim().is_empty() || output_path.as_os_str().is_empty() {
            return Err(Error::Usage);
        }
        let url = Url::parse(url.trim()).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self { url, output_path })
    }
}

/// Summary of a completed capture
#[derive(Debug, Clone)]
pub struct CaptureReport {
    /// Where the rendering was written
    pub output_path: PathBuf,
    /// Format dispatched from the output extension
    pub format: OutputFormat,
    /// Number of bytes written
    pub bytes_written: usize,
    /// URL of the page after redirects
    pub final_url: String,
}

/// A headless rendering context owned by exactly one capture run.
///
/// Implementations hold a single page. The runner drives it strictly in the
/// order `navigate`, `evaluate`, `render` and then hands it back through
/// `close`.
pub trait PageSession {
    /// Open a session sized to `config.viewport`
    fn open(config: &CaptureConfig) -> Result<Self>
    where
        Self: Sized;

    /// Navigate to `url` and wait at most `timeout` for the load-completion
    /// signal. Expiry is reported as [`Error::NavigationHang`].
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Run a script in the page's global context
    fn evaluate(&mut self, script: &str) -> Result<()>;

    /// Render `clip` in the given format
    fn render(&mut self, format: OutputFormat, clip: ClipRect) -> Result<Vec<u8>>;

    /// URL currently displayed by the page
    fn current_url(&self) -> String;

    /// Close the session and release the browser
    fn close(self) -> Result<()>;
}

/// Open a page session with the default backend
#[cfg(feature = "cdp")]
pub fn new_session(config: &CaptureConfig) -> Result<impl PageSession> {
    cdp::CdpSession::open(config)
}
