//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server listen address (e.g., "0.0.0.0:5000")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            let config = Self::load(path.as_ref())?;
            info!("Loaded configuration from: {}", path.as_ref().display());
            Ok(config)
        } else {
            info!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen, "0.0.0.0:5000");
    }

    #[test]
    fn test_empty_file_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.listen, "0.0.0.0:5000");
    }

    #[test]
    fn test_listen_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen = \"127.0.0.1:8080\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.listen, "0.0.0.0:5000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen = [nonsense").unwrap();

        assert!(Config::load_or_default(&path).is_err());
    }
}
