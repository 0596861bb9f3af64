//! The capture runner: one invocation, one navigation, one render.
//!
//! The run is strictly linear:
//! `Started -> AwaitingLoad -> Styling -> Rendering -> Terminated`.
//! The only branch is the argument check at `Started`, which prints the usage
//! line and stops before any session is opened.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, error, info, warn};

use crate::{style, CaptureConfig, CaptureReport, Error, Invocation, OutputFormat, PageSession, Result};

/// Printed to stdout when the arguments are not exactly `<url> <filename>`.
pub const USAGE: &str = "Usage: screenshot.js <url> <filename>";

/// Exit status for a completed capture or a usage message
pub const EXIT_OK: u8 = 0;
/// Exit status for any failure after the arguments were accepted
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "screenshot.js", disable_help_flag = true, disable_version_flag = true)]
struct CliArgs {
    #[arg(allow_hyphen_values = true)]
    url: String,
    #[arg(allow_hyphen_values = true)]
    filename: PathBuf,
}

/// Progress of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Started,
    AwaitingLoad,
    Styling,
    Rendering,
    Terminated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Started => "started",
            Stage::AwaitingLoad => "awaiting-load",
            Stage::Styling => "styling",
            Stage::Rendering => "rendering",
            Stage::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Parse a full argument vector (program name first) into an invocation.
///
/// Anything other than exactly two non-empty positionals is [`Error::Usage`].
/// The count is taken on the raw vector, so a `--` separator counts as an
/// entry of its own.
pub fn parse_args<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() != 3 {
        debug!("expected 2 arguments, got {}", args.len().saturating_sub(1));
        return Err(Error::Usage);
    }

    let cli = CliArgs::try_parse_from(args).map_err(|e| {
        debug!("argument parsing failed: {:?}", e.kind());
        Error::Usage
    })?;
    Invocation::new(&cli.url, cli.filename)
}

/// Run `body` against the session, then release the session whatever the
/// outcome was.
pub fn with_session<S, T, F>(mut session: S, body: F) -> Result<T>
where
    S: PageSession,
    F: FnOnce(&mut S) -> Result<T>,
{
    let outcome = body(&mut session);
    if let Err(e) = session.close() {
        warn!("failed to release page session: {}", e);
    }
    debug!("stage: {}", Stage::Terminated);
    outcome
}

/// Navigate, normalise the background and render the clip region.
pub fn render_page<S: PageSession>(
    session: &mut S,
    url: &str,
    format: OutputFormat,
    config: &CaptureConfig,
) -> Result<Vec<u8>> {
    debug!("stage: {} ({})", Stage::AwaitingLoad, url);
    session.navigate(url, config.load_timeout())?;

    debug!("stage: {}", Stage::Styling);
    session.evaluate(&style::background_script(&config.background_css))?;

    debug!("stage: {} ({})", Stage::Rendering, format);
    session.render(format, config.clip)
}

/// Drive an already-open session through one capture and release it.
pub fn capture_with<S: PageSession>(session: S, invocation: &Invocation, config: &CaptureConfig) -> Result<CaptureReport> {
    let format = OutputFormat::from_path(&invocation.output_path)?;

    with_session(session, |session| {
        let bytes = render_page(session, invocation.url.as_str(), format, config)?;

        fs::write(&invocation.output_path, &bytes).map_err(|source| Error::Io {
            path: invocation.output_path.clone(),
            source,
        })?;

        Ok(CaptureReport {
            output_path: invocation.output_path.clone(),
            format,
            bytes_written: bytes.len(),
            final_url: session.current_url(),
        })
    })
}

/// Check the output format, open a session with `open`, and capture.
///
/// The format is checked first so an unrenderable path never launches a
/// browser.
pub fn execute_with<S, F>(open: F, invocation: &Invocation, config: &CaptureConfig) -> Result<CaptureReport>
where
    S: PageSession,
    F: FnOnce(&CaptureConfig) -> Result<S>,
{
    OutputFormat::from_path(&invocation.output_path)?;
    debug!("stage: {}", Stage::Started);
    let session = open(config)?;
    capture_with(session, invocation, config)
}

/// Capture with the default CDP backend.
#[cfg(feature = "cdp")]
pub fn capture(invocation: &Invocation, config: &CaptureConfig) -> Result<CaptureReport> {
    execute_with(crate::new_session, invocation, config)
}

/// Command-line entry point, parameterised over the session backend and the
/// stream the usage line goes to. Returns the process exit status.
pub fn run_with<I, T, S, F, W>(args: I, config: &CaptureConfig, open: F, out: &mut W) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    S: PageSession,
    F: FnOnce(&CaptureConfig) -> Result<S>,
    W: Write,
{
    let invocation = match parse_args(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            debug!("rejecting invocation: {}", e);
            if let Err(e) = writeln!(out, "{}", USAGE) {
                warn!("failed to print usage: {}", e);
            }
            return EXIT_OK;
        }
    };

    match execute_with(open, &invocation, config) {
        Ok(report) => {
            info!(
                "captured {} to {} ({} bytes, {})",
                report.final_url,
                report.output_path.display(),
                report.bytes_written,
                report.format.mime_type()
            );
            EXIT_OK
        }
        Err(e) => {
            error!("capture of {} failed: {}", invocation.url, e);
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run the binary: default configuration, CDP backend, usage on stdout.
#[cfg(feature = "cdp")]
pub fn run<I, T>(args: I) -> std::process::ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = run_with(args, &CaptureConfig::default(), crate::new_session, &mut out);
    std::process::ExitCode::from(code)
}
