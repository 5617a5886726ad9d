pub mod types;

pub use types::{
    ExtractedText, FailureKind, FailureReason, Image, ImageId, ImageOrigin, Notification,
    ScanState,
};
