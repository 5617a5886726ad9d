pub mod image_source;
pub mod notification;
pub mod preview;
pub mod session;
pub mod view;

#[cfg(test)]
mod tests;

pub use image_source::{ImageSource, ImageSourceError, PathImageSource, detect_media_type};
pub use notification::{ActiveNotification, NotificationCenter};
pub use preview::{Preview, derive_preview};
pub use session::{ScanSession, SessionEvent, SubmitOutcome};
pub use view::ScanView;
