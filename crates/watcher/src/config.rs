//! Watcher configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Smallest refresh interval accepted; the config file counts in milliseconds
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// Upper bound accepted for the refresh interval
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Settings for a watch session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Time between two scans
    #[serde(rename = "refresh_interval_ms", with = "duration_ms")]
    pub refresh_interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(1),
        }
    }
}

/// Rejected configuration value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "refresh_interval_ms must be between 1 and {}",
        MAX_REFRESH_INTERVAL.as_millis()
    )]
    RefreshInterval,
}

impl WatcherConfig {
    pub fn with_refresh_interval(refresh_interval: Duration) -> Self {
        Self { refresh_interval }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval < MIN_REFRESH_INTERVAL
            || self.refresh_interval > MAX_REFRESH_INTERVAL
        {
            return Err(ConfigError::RefreshInterval);
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() % 1_000_000 != 0 {
            return Err(S::Error::custom(format!(
                "{value:?} is not a whole number of milliseconds"
            )));
        }
        let ms = u64::try_from(value.as_millis()).map_err(|_| {
            S::Error::custom(format!("{value:?} does not fit in u64 milliseconds"))
        })?;
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
