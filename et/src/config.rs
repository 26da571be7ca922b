//! EcoTrip configuration types and loading

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main EcoTrip configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversational backend configuration
    pub backend: BackendConfig,

    /// Emission recalculation service configuration
    pub emissions: EmissionsConfig,

    /// Chat behavior configuration
    pub chat: ChatConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .ecotrip.yml
        let local_config = PathBuf::from(".ecotrip.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/ecotrip/ecotrip.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ecotrip").join("ecotrip.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Conversational backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Emission recalculation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsConfig {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Chat behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// How many history entries accompany each chat request
    #[serde(rename = "history-window")]
    pub history_window: usize,

    /// Assistant greeting shown when the transcript is empty
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            greeting: "Hello! I'm your eco-friendly travel assistant. 🌱 I can help you plan a trip with \
                       minimal carbon impact. Where would you like to go?"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.chat.history_window, 10);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
backend:
  base-url: https://ecotrip.example.com
  timeout-ms: 15000

emissions:
  base-url: https://emissions.example.com
  timeout-ms: 5000

chat:
  history-window: 20
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.backend.base_url, "https://ecotrip.example.com");
        assert_eq!(config.backend.timeout_ms, 15_000);
        assert_eq!(config.emissions.base_url, "https://emissions.example.com");
        assert_eq!(config.chat.history_window, 20);
        // Unspecified values keep defaults
        assert!(config.chat.greeting.contains("travel assistant"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
backend:
  base-url: http://10.0.0.2:5000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.backend.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.backend.timeout_ms, 30_000);
        assert_eq!(config.emissions.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecotrip.yml");
        fs::write(&path, "chat:\n  history-window: 5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.chat.history_window, 5);
    }

    #[test]
    fn test_load_from_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/ecotrip.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
