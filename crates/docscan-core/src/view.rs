use docscan_types::{FailureReason, ImageOrigin, Notification, ScanState};

use crate::preview::Preview;

/// Shown in place of the result when the backend found nothing to read
pub const NO_TEXT_DETECTED: &str = "(no text detected)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    pub name: Option<String>,
    pub media_type: String,
    pub origin: ImageOrigin,
    pub size_bytes: usize,
}

/// What a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanView {
    pub phase: &'static str,
    pub image: Option<ImageSummary>,
    pub preview: Option<Preview>,
    pub loading: bool,
    pub can_submit: bool,
    pub result: Option<String>,
    pub failure: Option<FailureReason>,
    pub notification: Option<Notification>,
}

impl ScanView {
    pub fn project(
        state: &ScanState,
        preview: Option<&Preview>,
        notification: Option<Notification>,
    ) -> Self {
        let image = state.image().map(|image| ImageSummary {
            name: image.name().map(str::to_string),
            media_type: image.media_type().to_string(),
            origin: image.origin(),
            size_bytes: image.len(),
        });

        let result = match state {
            ScanState::Succeeded(_, text) if text.is_empty() => Some(NO_TEXT_DETECTED.to_string()),
            ScanState::Succeeded(_, text) => Some(text.as_str().to_string()),
            _ => None,
        };

        let failure = match state {
            ScanState::Failed(_, reason) => Some(reason.clone()),
            _ => None,
        };

        Self {
            phase: state.name(),
            image,
            preview: preview.cloned(),
            loading: state.is_submitting(),
            can_submit: state.image().is_some() && !state.is_submitting(),
            result,
            failure,
            notification,
        }
    }
}
