use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docscan_client::{RecognitionClient, RecognitionError};
use docscan_core::{NotificationCenter, ScanSession, SessionEvent};
use docscan_types::{ExtractedText, Image};
use kanal::AsyncReceiver;

/// Backend that always gives the same answer
pub struct FixedClient(pub Result<ExtractedText, RecognitionError>);

#[async_trait]
impl RecognitionClient for FixedClient {
    async fn recognize(&self, _image: &Image) -> Result<ExtractedText, RecognitionError> {
        self.0.clone()
    }
}

pub fn session_with(
    outcome: Result<ExtractedText, RecognitionError>,
) -> (ScanSession, AsyncReceiver<SessionEvent>) {
    let (tx, rx) = kanal::unbounded_async();
    let session = ScanSession::new(
        Arc::new(FixedClient(outcome)),
        NotificationCenter::new(Duration::from_secs(5)),
        tx,
    );
    (session, rx)
}

#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn temp_png(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docscan-app-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot-really-pixels").unwrap();
    path
}

/// Poll `buffer` until it contains `needle`
pub async fn wait_for_output(buffer: &SharedBuffer, needle: &str) {
    let found = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if buffer.contents().contains(needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(
        found.is_ok(),
        "never saw {:?} in output:\n{}",
        needle,
        buffer.contents()
    );
}
