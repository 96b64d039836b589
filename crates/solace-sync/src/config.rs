//! # Configuration
//!
//! On-disk TOML configuration for the embedding app.
//!
//! ## Configuration File Format
//! ```toml
//! # solace.toml
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//!
//! [storage]
//! database_path = "/home/user/.local/share/solace/solace.db"
//!
//! [backend]
//! url = "https://api.solace.example"
//! ```
//!
//! Load order: defaults, then the config file (when present), then
//! `SOLACE_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Device Configuration
// =============================================================================

/// Configuration for this device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unique device identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    pub id: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: Uuid::new_v4().to_string(),
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

/// Where the local database lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file. When empty, the platform data
    /// directory is used.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolves the database path, falling back to the platform data dir.
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.database_path {
            return Some(path.clone());
        }
        directories::ProjectDirs::from("com", "solace", "solace")
            .map(|dirs| dirs.data_dir().join("solace.db"))
    }
}

// =============================================================================
// Backend Configuration
// =============================================================================

/// The remote backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the remote service.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

fn default_backend_url() -> String {
    "https://api.solace.example".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            url: default_backend_url(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete configuration for the sync layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Device-specific configuration.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,
}

impl SyncConfig {
    /// Creates a config with defaults and a generated device id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating the directory if needed.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.device.id.is_empty() {
            return Err(SyncError::ConfigLoadFailed("device id is empty".into()));
        }

        if !self.backend.url.starts_with("https://") && !self.backend.url.starts_with("http://") {
            return Err(SyncError::ConfigLoadFailed(format!(
                "backend url must start with http:// or https://, got: {}",
                self.backend.url
            )));
        }

        Ok(())
    }

    /// Applies `SOLACE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("SOLACE_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device id from environment");
            self.device.id = id;
        }

        if let Ok(url) = std::env::var("SOLACE_BACKEND_URL") {
            debug!(url = %url, "Overriding backend url from environment");
            self.backend.url = url;
        }

        if let Ok(path) = std::env::var("SOLACE_DATABASE_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "solace", "solace")
            .map(|dirs| dirs.config_dir().join("solace.toml"))
    }

    /// Returns the device id.
    pub fn device_id(&self) -> &str {
        &self.device.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert!(!config.device.id.is_empty()); // Auto-generated
        assert!(config.backend.url.starts_with("https://"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        config.device.id = String::new();
        assert!(config.validate().is_err());

        config.device.id = "dev-1".to_string();
        config.backend.url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "https://api.solace.example".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SyncConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[device]"));
        assert!(toml_str.contains("[backend]"));

        let parsed: SyncConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.device.id, config.device.id);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("solace.toml");

        let mut config = SyncConfig::default();
        config.storage.database_path = Some(PathBuf::from("/tmp/solace.db"));
        config.save(Some(path.clone())).unwrap();

        let loaded = SyncConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.device.id, config.device.id);
        assert_eq!(
            loaded.storage.database_path.as_deref(),
            Some(std::path::Path::new("/tmp/solace.db"))
        );
    }
}
