use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docscan_client::{RecognitionClient, RecognitionError};
use docscan_types::{ExtractedText, Image, ImageOrigin};
use kanal::AsyncReceiver;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::image_source::{ImageSource, ImageSourceError};
use crate::session::{ScanSession, SessionEvent};

pub enum Script {
    Reply(Result<ExtractedText, RecognitionError>),
    Panic,
}

/// Fake backend: answers from a script, optionally holding each call until released
pub struct ScriptedClient {
    script: Mutex<VecDeque<Script>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Script>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn replying(outcome: Result<ExtractedText, RecognitionError>) -> Self {
        Self::new(vec![Script::Reply(outcome)])
    }

    /// Calls block until `release` is called once per call
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionClient for ScriptedClient {
    async fn recognize(&self, _image: &Image) -> Result<ExtractedText, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Script::Reply(outcome)) => outcome,
            Some(Script::Panic) => panic!("scripted client panic"),
            None => Ok(ExtractedText::from("unscripted")),
        }
    }
}

/// Source that hands out a fixed result
pub struct FixedSource(pub Option<Image>);

#[async_trait]
impl ImageSource for FixedSource {
    async fn acquire(&self, _origin: ImageOrigin) -> Result<Option<Image>, ImageSourceError> {
        Ok(self.0.clone())
    }
}

pub struct BrokenSource;

#[async_trait]
impl ImageSource for BrokenSource {
    async fn acquire(&self, _origin: ImageOrigin) -> Result<Option<Image>, ImageSourceError> {
        Err(ImageSourceError::UnsupportedMediaType("notes.txt".to_string()))
    }
}

pub fn png(name: &str) -> Image {
    Image::new(b"\x89PNG\r\n\x1a\nbody".to_vec(), "image/png", ImageOrigin::File).with_name(name)
}

pub async fn next_event(rx: &AsyncReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("session channel closed")
}

/// Apply events until a recognition result has been handled; returns whether it was applied
pub async fn settle_recognition(session: &mut ScanSession, rx: &AsyncReceiver<SessionEvent>) -> bool {
    loop {
        let event = next_event(rx).await;
        let is_recognition = matches!(event, SessionEvent::RecognitionFinished { .. });
        let applied = session.apply(event);
        if is_recognition {
            return applied;
        }
    }
}

/// Wait for the next recognition event without applying anything
pub async fn next_recognition(rx: &AsyncReceiver<SessionEvent>) -> SessionEvent {
    loop {
        let event = next_event(rx).await;
        if matches!(event, SessionEvent::RecognitionFinished { .. }) {
            return event;
        }
    }
}
