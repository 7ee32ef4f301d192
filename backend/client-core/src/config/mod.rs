use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;
const APP_DIR_NAME: &str = "social-client";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection segment under which the post endpoints live.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection: default_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a query/filter change triggers a fetch.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl SearchConfig {
    /// Debounce quiet period as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: ApiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    crate::DEFAULT_API_BASE_URL.to_string()
}
fn default_collection() -> String {
    crate::SOCIAL_COLLECTION.to_string()
}
fn default_page_size() -> u32 {
    crate::posts::PAGE_SIZE
}
fn default_debounce_ms() -> u64 {
    300
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Platform default config directory for this application.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Load config from {config_dir}/config.json.
    ///
    /// A missing file is not an error and yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is unreadable,
    /// invalid JSON, or fails validation.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::here(),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::here(),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using atomic write.
    ///
    /// Uses temp file + rename for atomicity (no corruption on crash).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation,
    /// serialization, write or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::here(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename (POSIX guarantees atomicity)
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::here(),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        let url = Url::parse(&self.api.base_url).map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::here(),
            reason: format!("Invalid base URL {}: {}", self.api.base_url, e),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!("Invalid base URL scheme: {}", url.scheme()),
            });
        }

        if self.api.collection.is_empty() || self.api.collection.contains('/') {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!("Invalid collection segment: {:?}", self.api.collection),
            });
        }

        if self.search.page_size == 0 || self.search.page_size > 100 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!(
                    "Invalid page size: {} (must be 1-100)",
                    self.search.page_size
                ),
            });
        }

        if self.search.debounce_ms > 10_000 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::here(),
                reason: format!(
                    "Invalid debounce: {} ms (must be 0-10000)",
                    self.search.debounce_ms
                ),
            });
        }

        Ok(())
    }
}
