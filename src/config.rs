/// Application configuration
///
/// Settings are layered: built-in defaults first, then an optional TOML
/// file in the user's config directory, then FOOD_ANALYZER_* environment
/// variables. A missing file is fine; the defaults point at a local
/// backend.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the analysis service when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Base URL of the analysis service
    pub endpoint: String,
    /// How long to wait for an analysis response before giving up
    pub timeout_secs: u64,
    /// Which camera device to open for photo capture
    pub camera_index: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            camera_index: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from all layers.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("camera_index", 0_i64)?;

        if let Some(path) = Self::config_file() {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(Environment::with_prefix("FOOD_ANALYZER"))
            .build()?
            .try_deserialize()
    }

    /// Path to the optional config file:
    /// - Linux: ~/.config/food-analyzer/config.toml
    /// - macOS: ~/Library/Application Support/food-analyzer/config.toml
    /// - Windows: %APPDATA%\food-analyzer\config.toml
    fn config_file() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("food-analyzer");
        path.push("config.toml");
        Some(path)
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.camera_index, 0);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig {
            timeout_secs: 5,
            ..AppConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
