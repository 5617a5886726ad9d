use docscan_types::ExtractedText;
use serde::Deserialize;

use crate::RecognitionError;

pub const PARSE_ERROR_MESSAGE: &str = "Failed to parse recognition response";
pub const MISSING_FIELDS_MESSAGE: &str = "Recognition response carried neither text nor error";

/// Body shape of the recognition endpoint: `{ "text": ... }` or `{ "error": ... }`
#[derive(Deserialize)]
struct RecognitionResponse {
    text: Option<String>,
    error: Option<String>,
}

/// Classify a fully-read response body.
///
/// The HTTP status plays no part here: an `error` field wins even on a 200,
/// and a `text` field wins even on a 500.
pub fn interpret_body(body: &str) -> Result<ExtractedText, RecognitionError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("recognition response is not JSON: {}", e);
        RecognitionError::Protocol(PARSE_ERROR_MESSAGE.to_string())
    })?;

    // serde would happily read a struct out of a JSON array
    if !value.is_object() {
        tracing::warn!("recognition response is not a JSON object");
        return Err(RecognitionError::Protocol(PARSE_ERROR_MESSAGE.to_string()));
    }

    let response: RecognitionResponse = serde_json::from_value(value).map_err(|e| {
        tracing::warn!("recognition response has unexpected field types: {}", e);
        RecognitionError::Protocol(PARSE_ERROR_MESSAGE.to_string())
    })?;

    match response {
        RecognitionResponse {
            error: Some(error), ..
        } if !error.is_empty() => Err(RecognitionError::Application(error)),
        RecognitionResponse {
            text: Some(text), ..
        } => Ok(ExtractedText(text)),
        _ => Err(RecognitionError::Protocol(MISSING_FIELDS_MESSAGE.to_string())),
    }
}
