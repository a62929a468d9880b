use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MODERN_TIER_THRESHOLD: u32 = 33;
pub const DEFAULT_GALLERY_MAX_ITEMS: u32 = 10;
pub const DEFAULT_LOG_TAG: &str = "DebugPicker";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Application-private directory acquired files are written under.
    pub storage_root: PathBuf,
    #[serde(default = "default_modern_tier_threshold")]
    pub modern_tier_threshold: u32,
    #[serde(default = "default_gallery_max_items")]
    pub gallery_max_items: u32,
    #[serde(default = "default_log_tag")]
    pub log_tag: String,
}

fn default_modern_tier_threshold() -> u32 {
    DEFAULT_MODERN_TIER_THRESHOLD
}

fn default_gallery_max_items() -> u32 {
    DEFAULT_GALLERY_MAX_ITEMS
}

fn default_log_tag() -> String {
    DEFAULT_LOG_TAG.to_string()
}

impl Config {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            modern_tier_threshold: DEFAULT_MODERN_TIER_THRESHOLD,
            gallery_max_items: DEFAULT_GALLERY_MAX_ITEMS,
            log_tag: default_log_tag(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the storage root
        config.storage_root =
            Self::expand_path(&config.storage_root).unwrap_or(config.storage_root);
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/samplepicker");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery_max_items == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gallery_max_items",
                reason: "must allow at least one item".to_string(),
            });
        }
        if self.log_tag.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_tag",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
