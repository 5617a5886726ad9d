use std::env;

use serde::{Deserialize, Serialize};

fn default_endpoint_url() -> String {
    "http://localhost:3000/api/ocr".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Where and how the recognition backend is reached
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RecognitionConfig {
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// Whole-request timeout, connect included
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl RecognitionConfig {
    pub fn new() -> Self {
        let endpoint_url = env::var("RECOGNITION_URL").unwrap_or_else(|_| default_endpoint_url());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_request_timeout_secs);

        Self {
            endpoint_url,
            request_timeout_secs,
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
