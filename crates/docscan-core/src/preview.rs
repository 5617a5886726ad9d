use std::io::Cursor;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use docscan_types::{Image, ImageId};
use image::ImageReader;

/// Displayable encoding of an image. Only ever rendered, never uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    image_id: ImageId,
    data_uri: Arc<str>,
    dimensions: Option<(u32, u32)>,
}

impl Preview {
    pub fn derive(image: &Image) -> Self {
        let encoded = general_purpose::STANDARD.encode(image.data());
        let data_uri = format!("data:{};base64,{}", image.media_type(), encoded);

        Self {
            image_id: image.id(),
            data_uri: data_uri.into(),
            dimensions: read_dimensions(image.data()),
        }
    }

    /// The image this preview was derived from
    pub fn image_id(&self) -> ImageId {
        self.image_id
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// Pixel size, when the header could be decoded
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

fn read_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Derive off the async threads; base64 of a phone photo is not free.
pub async fn derive_preview(image: Image) -> Result<Preview, tokio::task::JoinError> {
    tokio::task::spawn_blocking(move || Preview::derive(&image)).await
}
