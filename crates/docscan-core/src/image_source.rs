use std::path::{Path, PathBuf};

use async_trait::async_trait;
use docscan_types::{Image, ImageOrigin};
use image::ImageFormat;

#[derive(Debug, thiserror::Error)]
pub enum ImageSourceError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a supported image")]
    UnsupportedMediaType(String),

    #[error("{0} is empty")]
    Empty(String),
}

/// User-driven acquisition of a single image (camera or file picker)
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// `Ok(None)` means the user backed out without choosing anything.
    async fn acquire(&self, origin: ImageOrigin) -> Result<Option<Image>, ImageSourceError>;
}

/// Picker that has already been resolved to a path, or to nothing.
pub struct PathImageSource {
    path: Option<PathBuf>,
}

impl PathImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self { path: None }
    }

    /// Blank input is a cancel
    pub fn from_choice(choice: &str) -> Self {
        let choice = choice.trim();
        if choice.is_empty() {
            Self::cancelled()
        } else {
            Self::new(choice)
        }
    }
}

#[async_trait]
impl ImageSource for PathImageSource {
    async fn acquire(&self, origin: ImageOrigin) -> Result<Option<Image>, ImageSourceError> {
        let Some(path) = &self.path else {
            tracing::debug!("[SOURCE] {} acquisition cancelled", origin);
            return Ok(None);
        };

        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ImageSourceError::Io {
                path: path.display().to_string(),
                source,
            })?;

        if data.is_empty() {
            return Err(ImageSourceError::Empty(path.display().to_string()));
        }

        let media_type = detect_media_type(&data, path)?;
        tracing::info!(
            "[SOURCE] acquired {} ({} bytes, {}) from {}",
            path.display(),
            data.len(),
            media_type,
            origin
        );

        let mut image = Image::new(data, media_type, origin);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            image = image.with_name(name);
        }

        Ok(Some(image))
    }
}

/// Sniff the payload first, fall back to the file extension.
pub fn detect_media_type(data: &[u8], path: &Path) -> Result<&'static str, ImageSourceError> {
    if let Ok(format) = image::guess_format(data) {
        return Ok(format.to_mime_type());
    }

    if let Ok(format) = ImageFormat::from_path(path) {
        return Ok(format.to_mime_type());
    }

    // Phone cameras: the image crate can't decode these but the backend can
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("heic") => Ok("image/heic"),
        Some("heif") => Ok("image/heif"),
        _ => Err(ImageSourceError::UnsupportedMediaType(
            path.display().to_string(),
        )),
    }
}
