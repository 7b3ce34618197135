//! Watcher settings from a TOML file plus command-line overrides

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use watcher::WatcherConfig;

/// Load settings from `path`, or defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<WatcherConfig> {
    let Some(path) = path else {
        return Ok(WatcherConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: WatcherConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(config)
}

/// Apply command-line overrides and validate the result
pub fn resolve(mut config: WatcherConfig, interval_ms: Option<u64>) -> Result<WatcherConfig> {
    if let Some(ms) = interval_ms {
        config.refresh_interval = Duration::from_millis(ms);
    }

    config.validate().context("Invalid configuration value")?;
    Ok(config)
}

/// Example configuration file contents
pub fn example_config() -> String {
    r#"# dirwatch configuration

# Time between two scans of the watched directory (1 to 3600000)
refresh_interval_ms = 1000
"#
    .to_string()
}
