mod http;
mod response;


pub use http::{FILE_FIELD, HttpRecognitionClient};
pub use response::interpret_body;

use docscan_types::{ExtractedText, FailureKind, FailureReason, Image};

/// Recognition backend interface
#[async_trait::async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Send one image, get its text back. Never retries.
    async fn recognize(&self, image: &Image) -> Result<ExtractedText, RecognitionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Protocol(String),

    #[error("{0}")]
    Application(String),
}

impl RecognitionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            RecognitionError::Transport(_) => FailureKind::Transport,
            RecognitionError::Protocol(_) => FailureKind::Protocol,
            RecognitionError::Application(_) => FailureKind::Application,
        }
    }
}

impl From<RecognitionError> for FailureReason {
    fn from(err: RecognitionError) -> Self {
        let kind = err.kind();
        let message = match err {
            RecognitionError::Transport(m)
            | RecognitionError::Protocol(m)
            | RecognitionError::Application(m) => m,
        };
        FailureReason::new(kind, message)
    }
}
