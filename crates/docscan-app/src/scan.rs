use std::path::Path;

use anyhow::Context;
use docscan_core::{PathImageSource, ScanSession, SessionEvent, SubmitOutcome};
use docscan_types::{ImageOrigin, ScanState};
use kanal::AsyncReceiver;

/// Acquire `path`, submit it, and wait for the session to settle.
pub async fn scan_once(
    session: &mut ScanSession,
    session_rx: &AsyncReceiver<SessionEvent>,
    path: &Path,
    origin: ImageOrigin,
) -> anyhow::Result<ScanState> {
    let source = PathImageSource::new(path);
    if session.acquire(&source, origin).await.is_none() {
        let reason = session
            .notifications()
            .current()
            .map(|n| n.message)
            .unwrap_or_else(|| "no image acquired".to_string());
        anyhow::bail!(reason);
    }

    if session.submit() != SubmitOutcome::Started {
        anyhow::bail!("submission did not start");
    }

    while session.state().is_submitting() {
        let event = session_rx
            .recv()
            .await
            .context("session channel closed while waiting for recognition")?;
        session.apply(event);
    }

    // A preview may still be in flight, pick it up if it is already there
    while let Ok(Some(event)) = session_rx.try_recv() {
        session.apply(event);
    }

    Ok(session.state().clone())
}
