use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::notification::NotificationConfig;
use self::recognition::RecognitionConfig;

pub mod logging;
pub mod notification;
pub mod recognition;

pub use logging::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn new() -> Self {
        Config {
            recognition: RecognitionConfig::new(),
            notification: NotificationConfig::new(),
            logging: LoggingConfig::new(),
        }
    }

    /// Layer a JSON profile on top of `self`. Keys missing from the profile keep their current value.
    pub fn merge_json(self, profile: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(profile)?;
        let mut base = serde_json::to_value(&self)?;
        merge_values(&mut base, overrides);
        Ok(serde_json::from_value(base)?)
    }

    pub fn merge_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_json(&data)
    }
}

fn merge_values(base: &mut serde_json::Value, overrides: serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
