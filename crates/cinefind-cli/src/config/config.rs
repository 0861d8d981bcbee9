//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default quiet period before a typed term is committed (milliseconds).
const DEFAULT_DEBOUNCE_MS: u64 = 800;

/// Default number of trending counters to load at startup.
const DEFAULT_TRENDING_LIMIT: u32 = 5;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Search pipeline settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Counter service settings.
    #[serde(default)]
    pub counter: CounterConfig,
}

/// Search pipeline configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period before a typed term is committed (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Counter service configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterConfig {
    /// Base URL of the hosted counter service.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Number of trending counters to load at startup.
    #[serde(default = "default_trending_limit")]
    pub trending_limit: u32,
}

/// Serde default for [`SearchConfig::debounce_ms`].
const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Serde default for [`CounterConfig::trending_limit`].
const fn default_trending_limit() -> u32 {
    DEFAULT_TRENDING_LIMIT
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            trending_limit: DEFAULT_TRENDING_LIMIT,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.search.debounce_ms, 800);
        assert_eq!(config.counter.trending_limit, 5);
        assert!(config.counter.endpoint.is_none());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        // Arrange
        let config = AppConfig {
            search: SearchConfig { debounce_ms: 250 },
            counter: CounterConfig {
                endpoint: Some(String::from("https://counters.example.net")),
                trending_limit: 10,
            },
        };

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Assert
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let path = Path::new("/tmp/cinefind_test_nonexistent_config.toml");

        // Act
        let config = AppConfig::load(path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig {
            search: SearchConfig { debounce_ms: 500 },
            counter: CounterConfig {
                endpoint: Some(String::from("http://localhost:8080")),
                trending_limit: 3,
            },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[counter]\nendpoint = \"http://localhost:9\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.search.debounce_ms, 800);
        assert_eq!(config.counter.trending_limit, 5);
        assert_eq!(
            config.counter.endpoint.as_deref(),
            Some("http://localhost:9")
        );
    }
}
