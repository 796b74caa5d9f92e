//! Configuration Storage Implementation
//!
//! JSON configuration file with:
//! - Component definitions handed to the model registry
//! - Logging settings
//! - Atomic writes using temp file + rename

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::LoggingConfig;
use crate::registry::ResourceConfig;

/// Configuration file error types
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration result type
pub type ConfigFileResult<T> = Result<T, ConfigFileError>;

/// Application configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Components to construct through the model registry
    #[serde(default)]
    pub components: Vec<ResourceConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Platform configuration path, e.g. `~/.config/network-estop/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("network-estop")
            .join("config.json")
    }

    /// Load and sanity-check a configuration file
    pub async fn load(path: &Path) -> ConfigFileResult<Self> {
        if !path.exists() {
            return Err(ConfigFileError::NotFound(path.to_path_buf()));
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save with atomic write
    pub async fn save(&self, path: &Path) -> ConfigFileResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    pub fn component(&self, name: &str) -> Option<&ResourceConfig> {
        self.components.iter().find(|c| c.name == name)
    }

    fn check(&self) -> ConfigFileResult<()> {
        let mut seen = HashSet::new();
        for component in &self.components {
            if component.name.is_empty() {
                return Err(ConfigFileError::Invalid("component without a name".to_string()));
            }
            if !seen.insert(component.name.as_str()) {
                return Err(ConfigFileError::Invalid(format!(
                    "duplicate component name: {}",
                    component.name
                )));
            }
        }
        Ok(())
    }
}
