use std::time::Duration;

use async_trait::async_trait;
use docscan_config::recognition::RecognitionConfig;
use docscan_types::{ExtractedText, Image};
use reqwest::multipart::{Form, Part};

use crate::response::interpret_body;
use crate::{RecognitionClient, RecognitionError};

/// Multipart field the endpoint reads the image from
pub const FILE_FIELD: &str = "file";

/// reqwest-backed client for the recognition endpoint
#[derive(Clone)]
pub struct HttpRecognitionClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpRecognitionClient {
    pub fn new(config: &RecognitionConfig) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RecognitionError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn build_form(image: &Image) -> Result<Form, RecognitionError> {
        let file_name = match image.name() {
            Some(name) => name.to_string(),
            None => format!("image.{}", extension_for(image.media_type())),
        };

        let part = Part::bytes(image.data().to_vec())
            .file_name(file_name)
            .mime_str(image.media_type())
            .map_err(|e| {
                RecognitionError::Transport(format!(
                    "Invalid media type '{}': {}",
                    image.media_type(),
                    e
                ))
            })?;

        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn recognize(&self, image: &Image) -> Result<ExtractedText, RecognitionError> {
        let form = Self::build_form(image)?;

        tracing::debug!(
            "[RECOGNITION] POST {} ({} bytes, {})",
            self.endpoint_url,
            image.len(),
            image.media_type()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        // Read everything before parsing so a truncated body surfaces as transport failure
        let body = response.text().await.map_err(transport_error)?;

        tracing::debug!("[RECOGNITION] HTTP {} with {} byte body", status, body.len());
        if !status.is_success() {
            tracing::warn!("[RECOGNITION] backend answered HTTP {}", status);
        }

        interpret_body(&body)
    }
}

fn transport_error(e: reqwest::Error) -> RecognitionError {
    let message = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Could not connect to recognition service: {}", e)
    } else {
        e.to_string()
    };
    tracing::error!("[RECOGNITION] transport failure: {}", e);
    RecognitionError::Transport(message)
}

fn extension_for(media_type: &str) -> &str {
    match media_type {
        "image/jpeg" => "jpg",
        "image/svg+xml" => "svg",
        other => other
            .strip_prefix("image/")
            .filter(|ext| !ext.is_empty())
            .unwrap_or("bin"),
    }
}
