use crate::{runner, CaptureConfig, CaptureReport, Error, Invocation, PageSession, Result};
use log::debug;
use std::thread;
use tokio::sync::oneshot;

/// Run one capture on a dedicated worker thread and await its report.
///
/// The session is opened, driven and released entirely on the worker, so the
/// backend does not need to be `Send`. Only the report crosses back to the
/// awaiting task.
pub async fn capture_async_with<S, F>(open: F, invocation: Invocation, config: CaptureConfig) -> Result<CaptureReport>
where
    S: PageSession + 'static,
    F: FnOnce(&CaptureConfig) -> Result<S> + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel::<Result<CaptureReport>>();

    thread::Builder::new()
        .name("webshot-capture".into())
        .spawn(move || {
            let res = runner::execute_with(open, &invocation, &config);
            // Receiver may have been dropped by a cancelled caller.
            let _ = done_tx.send(res);
        })
        .map_err(|e| Error::InitializationError(format!("Failed to spawn capture worker: {}", e)))?;

    debug!("awaiting capture worker");
    done_rx
        .await
        .map_err(|_| Error::Other("capture worker exited before reporting a result".into()))?
}

/// [`capture_async_with`] using the default CDP backend.
#[cfg(feature = "cdp")]
pub async fn capture_async(invocation: Invocation, config: CaptureConfig) -> Result<CaptureReport> {
    capture_async_with(crate::cdp::CdpSession::open, invocation, config).await
}
