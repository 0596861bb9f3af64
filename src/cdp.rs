//! Chrome DevTools Protocol page session

use crate::{CaptureConfig, ClipRect, Error, OutputFormat, PageSession, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::debug;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// CSS pixels per inch, used to size PDF pages to the clip region
const CSS_PX_PER_INCH: f64 = 96.0;

// Extra idle allowance on top of the load timeout before the browser
// connection is considered dead
const IDLE_GRACE: Duration = Duration::from_secs(30);

/// CDP-based page session (uses the `headless_chrome` crate)
///
/// Launches a headless Chrome instance and drives a single tab. Dropping the
/// session terminates the browser process even when `close` is never called.
pub struct CdpSession {
    browser: Browser,
    tab: Arc<Tab>,
    config: CaptureConfig,
}

impl PageSession for CdpSession {
    fn open(config: &CaptureConfig) -> Result<Self> {
        let mut builder = LaunchOptions::default_builder();
        builder
            .headless(true)
            .sandbox(config.sandbox)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .idle_browser_timeout(config.load_timeout().saturating_add(IDLE_GRACE));
        if let Some(path) = &config.chrome_path {
            builder.path(Some(path.clone()));
        }
        let launch_options = builder
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(config.load_timeout());

        debug!(
            "opened CDP session with viewport {}x{}",
            config.viewport.width, config.viewport.height
        );

        Ok(Self {
            browser,
            tab,
            config: config.clone(),
        })
    }

    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();

        // Navigation and the load wait run on a watcher thread so the wait can
        // be bounded here even when the backend blocks on a stalled server.
        let (done_tx, done_rx) = mpsc::channel();
        let tab = Arc::clone(&self.tab);
        let target = url.to_string();
        // On timeout the watcher is left detached; it ends once `close` drops
        // the browser and the pending CDP call fails.
        thread::spawn(move || {
            let res = tab
                .navigate_to(&target)
                .and_then(|tab| tab.wait_until_navigated())
                .map(|_| ())
                .map_err(|e| e.to_string());
            if let Err(late) = done_tx.send(res) {
                debug!("load result for {} arrived after the wait ended: {:?}", target, late.0);
            }
        });

        let hang = || Error::NavigationHang {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        };

        match done_rx.recv_timeout(timeout) {
            Ok(Ok(())) => {
                debug!("load completed for {} after {:?}", url, started.elapsed());
                Ok(())
            }
            Ok(Err(_)) if started.elapsed() >= timeout => Err(hang()),
            Ok(Err(msg)) => Err(Error::LoadError(format!("Navigation failed: {}", msg))),
            Err(RecvTimeoutError::Timeout) => Err(hang()),
            Err(RecvTimeoutError::Disconnected) => Err(Error::LoadError("load watcher exited without a result".into())),
        }
    }

    fn evaluate(&mut self, script: &str) -> Result<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| Error::ScriptError(format!("Evaluation failed: {}", e)))?;
        Ok(())
    }

    fn render(&mut self, format: OutputFormat, clip: ClipRect) -> Result<Vec<u8>> {
        let capture_format = match format {
            OutputFormat::Png => Page::CaptureScreenshotFormatOption::Png,
            OutputFormat::Jpeg => Page::CaptureScreenshotFormatOption::Jpeg,
            OutputFormat::Webp => Page::CaptureScreenshotFormatOption::Webp,
            OutputFormat::Pdf => return self.render_pdf(clip),
        };

        let quality = match format {
            OutputFormat::Jpeg => self.config.jpeg_quality,
            _ => None,
        };

        let viewport = Page::Viewport {
            x: clip.x as f64,
            y: clip.y as f64,
            width: clip.width as f64,
            height: clip.height as f64,
            scale: 1.0,
        };

        self.tab
            .capture_screenshot(capture_format, quality, Some(viewport), true)
            .map_err(|e| Error::RenderError(format!("Screenshot failed: {}", e)))
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn close(self) -> Result<()> {
        // Dropping the browser kills the child process.
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

impl CdpSession {
    fn render_pdf(&self, clip: ClipRect) -> Result<Vec<u8>> {
        let options = PrintToPdfOptions {
            paper_width: Some(clip.width as f64 / CSS_PX_PER_INCH),
            paper_height: Some(clip.height as f64 / CSS_PX_PER_INCH),
            margin_top: Some(0.0),
            margin_bottom: Some(0.0),
            margin_left: Some(0.0),
            margin_right: Some(0.0),
            print_background: Some(true),
            page_ranges: Some("1".to_string()),
            ..Default::default()
        };

        self.tab
            .print_to_pdf(Some(options))
            .map_err(|e| Error::RenderError(format!("PDF rendering failed: {}", e)))
    }
}
