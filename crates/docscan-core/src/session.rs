use std::sync::Arc;

use docscan_client::{RecognitionClient, RecognitionError};
use docscan_types::{ExtractedText, FailureReason, Image, ImageId, ImageOrigin, Notification, ScanState};
use kanal::AsyncSender;

use crate::image_source::ImageSource;
use crate::notification::NotificationCenter;
use crate::preview::{Preview, derive_preview};
use crate::view::ScanView;

pub const NO_IMAGE_MESSAGE: &str = "Please select an image";
pub const SUCCESS_MESSAGE: &str = "Text recognition complete";

/// Completion of an outstanding operation, fed back through [`ScanSession::apply`].
#[derive(Debug)]
pub enum SessionEvent {
    PreviewReady(Preview),
    RecognitionFinished {
        image_id: ImageId,
        outcome: Result<ExtractedText, RecognitionError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started,
    /// Nothing acquired yet, user was told
    NoImage,
    /// A request is already out, nothing sent
    AlreadyInFlight,
}

/// One scan session: the current image, its preview, and where it is in the
/// acquire → submit → result cycle.
///
/// All mutation goes through `&mut self` on the owning task. Background work
/// (preview derivation, recognition) reports back as [`SessionEvent`]s on the
/// channel given to [`ScanSession::new`]; each event carries the id of the image
/// it was started for, and events for an image that is no longer current are
/// dropped.
pub struct ScanSession {
    state: ScanState,
    preview: Option<Preview>,
    client: Arc<dyn RecognitionClient>,
    notifications: NotificationCenter,
    events_tx: AsyncSender<SessionEvent>,
}

impl ScanSession {
    pub fn new(
        client: Arc<dyn RecognitionClient>,
        notifications: NotificationCenter,
        events_tx: AsyncSender<SessionEvent>,
    ) -> Self {
        Self {
            state: ScanState::Idle,
            preview: None,
            client,
            notifications,
            events_tx,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Ask `source` for an image. Returns the new image's id, or `None` when
    /// the user cancelled or the source failed (state untouched either way).
    pub async fn acquire(&mut self, source: &dyn ImageSource, origin: ImageOrigin) -> Option<ImageId> {
        match source.acquire(origin).await {
            Ok(Some(image)) => {
                let id = image.id();
                self.load_image(image);
                Some(id)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("[SESSION] {} acquisition failed: {}", origin, e);
                self.notifications.notify(Notification::error(e.to_string()));
                None
            }
        }
    }

    /// Replace whatever was there with `image`, from any state.
    pub fn load_image(&mut self, image: Image) {
        tracing::info!(
            "[SESSION] {} -> ready (image {}, {})",
            self.state.name(),
            image.id(),
            image.origin()
        );

        self.preview = None;
        self.state = ScanState::Ready(image.clone());

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match derive_preview(image).await {
                Ok(preview) => {
                    if tx.send(SessionEvent::PreviewReady(preview)).await.is_err() {
                        tracing::debug!("[SESSION] session closed before preview was ready");
                    }
                }
                Err(e) => tracing::warn!("[SESSION] preview derivation failed: {}", e),
            }
        });
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        let image = match &self.state {
            ScanState::Idle => {
                let reason = FailureReason::user_input(NO_IMAGE_MESSAGE);
                self.notifications.notify(Notification::error(reason.message));
                return SubmitOutcome::NoImage;
            }
            ScanState::Submitting(image) => {
                tracing::debug!("[SESSION] submit ignored, image {} already in flight", image.id());
                return SubmitOutcome::AlreadyInFlight;
            }
            ScanState::Ready(image) | ScanState::Succeeded(image, _) | ScanState::Failed(image, _) => {
                image.clone()
            }
        };

        tracing::info!(
            "[SESSION] {} -> submitting (image {})",
            self.state.name(),
            image.id()
        );
        self.state = ScanState::Submitting(image.clone());

        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let image_id = image.id();

            // Inner task so a panicking client still ends the submission
            let request = tokio::spawn(async move { client.recognize(&image).await });
            let outcome = match request.await {
                Ok(outcome) => outcome,
                Err(e) => Err(RecognitionError::Transport(format!(
                    "Recognition aborted: {}",
                    e
                ))),
            };

            if tx
                .send(SessionEvent::RecognitionFinished { image_id, outcome })
                .await
                .is_err()
            {
                tracing::debug!("[SESSION] session closed before recognition of {} finished", image_id);
            }
        });

        SubmitOutcome::Started
    }

    /// Apply a completion. Returns `false` when it was stale and dropped.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::PreviewReady(preview) => {
                let current = self.state.image().map(Image::id);
                if current != Some(preview.image_id()) {
                    tracing::debug!("[SESSION] dropping preview for replaced image {}", preview.image_id());
                    return false;
                }
                self.preview = Some(preview);
                true
            }
            SessionEvent::RecognitionFinished { image_id, outcome } => {
                let image = match &self.state {
                    ScanState::Submitting(image) if image.id() == image_id => image.clone(),
                    other => {
                        tracing::warn!(
                            "[SESSION] discarding stale recognition result for {} (session is {})",
                            image_id,
                            other.name()
                        );
                        return false;
                    }
                };
                self.finish(image, outcome);
                true
            }
        }
    }

    fn finish(&mut self, image: Image, outcome: Result<ExtractedText, RecognitionError>) {
        match outcome {
            Ok(text) => {
                tracing::info!(
                    "[SESSION] submitting -> succeeded (image {}, {} chars)",
                    image.id(),
                    text.as_str().chars().count()
                );
                self.state = ScanState::Succeeded(image, text);
                self.notifications.notify(Notification::info(SUCCESS_MESSAGE));
            }
            Err(e) => {
                let reason = FailureReason::from(e);
                tracing::error!(
                    "[SESSION] submitting -> failed (image {}, {:?}): {}",
                    image.id(),
                    reason.kind,
                    reason.message
                );
                self.notifications
                    .notify(Notification::error(reason.message.clone()));
                self.state = ScanState::Failed(image, reason);
            }
        }
    }

    /// Back to idle, image and preview dropped. An in-flight result will be discarded.
    pub fn reset(&mut self) {
        tracing::info!("[SESSION] {} -> idle", self.state.name());
        self.state = ScanState::Idle;
        self.preview = None;
    }

    pub fn view(&self) -> ScanView {
        ScanView::project(&self.state, self.preview.as_ref(), self.notifications.current())
    }
}
