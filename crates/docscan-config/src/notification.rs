use std::env;

use serde::{Deserialize, Serialize};

fn default_ttl_ms() -> u64 {
    5000
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long a status message stays up before it clears itself
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

impl NotificationConfig {
    pub fn new() -> Self {
        let ttl_ms = env::var("NOTIFICATION_TTL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_ttl_ms);

        Self { ttl_ms }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
        }
    }
}
