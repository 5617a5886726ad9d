use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one acquisition. Two acquisitions of the same file get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    Camera,
    File,
}

impl fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageOrigin::Camera => f.write_str("camera"),
            ImageOrigin::File => f.write_str("file"),
        }
    }
}

/// A captured image. Immutable once created; clones share the payload.
#[derive(Clone)]
pub struct Image {
    id: ImageId,
    data: Arc<[u8]>,
    media_type: String,
    origin: ImageOrigin,
    name: Option<String>,
}

impl Image {
    pub fn new(data: impl Into<Arc<[u8]>>, media_type: impl Into<String>, origin: ImageOrigin) -> Self {
        Self {
            id: ImageId::new(),
            data: data.into(),
            media_type: media_type.into(),
            origin,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Image {}

// Payload bytes are left out on purpose, images can be megabytes.
impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("media_type", &self.media_type)
            .field("origin", &self.origin)
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Text the backend extracted. Empty means "no text detected", not a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText(pub String);

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ExtractedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ExtractedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Nothing to submit
    UserInput,
    /// Backend unreachable, timed out or aborted
    Transport,
    /// Backend answered with something that is not `{text}` or `{error}`
    Protocol,
    /// Backend answered `{error}`
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub message: String,
    pub kind: FailureKind,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn user_input(message: impl Into<String>) -> Self {
        Self::new(FailureKind::UserInput, message)
    }

    pub fn is_user_input(&self) -> bool {
        self.kind == FailureKind::UserInput
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The single transient status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Where a scan session is. Every non-idle state carries the image it is about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    Ready(Image),
    Submitting(Image),
    Succeeded(Image, ExtractedText),
    Failed(Image, FailureReason),
}

impl ScanState {
    pub fn image(&self) -> Option<&Image> {
        match self {
            ScanState::Idle => None,
            ScanState::Ready(image)
            | ScanState::Submitting(image)
            | ScanState::Succeeded(image, _)
            | ScanState::Failed(image, _) => Some(image),
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, ScanState::Submitting(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Succeeded(..) | ScanState::Failed(..))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Ready(_) => "ready",
            ScanState::Submitting(_) => "submitting",
            ScanState::Succeeded(..) => "succeeded",
            ScanState::Failed(..) => "failed",
        }
    }
}
