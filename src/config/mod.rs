//! Configuration management for otacheck

pub mod schema;

pub use schema::Config;

use crate::error::{OtaError, OtaResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes the otacheck TOML file
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Use `path` instead of the per-user location (`--config`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/otacheck/config.toml`, or `./otacheck/config.toml` when
    /// the platform has no config dir
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("otacheck")
            .join("config.toml")
    }

    /// A missing file yields the built-in device defaults
    pub async fn load(&self) -> OtaResult<Config> {
        let path = &self.config_path;
        if !fs::try_exists(path).await.unwrap_or(false) {
            debug!("No config at {}, using device defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| OtaError::io(format!("reading config from {}", path.display()), e))?;
        toml::from_str(&content).map_err(|e| OtaError::ConfigInvalid {
            path: path.clone(),
            reason: e.to_string(),
        })
    }

    /// Write `config`, creating the parent directory first
    pub async fn save(&self, config: &Config) -> OtaResult<()> {
        let path = &self.config_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| OtaError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(path, content)
            .await
            .map_err(|e| OtaError::io(format!("writing config to {}", path.display()), e))?;

        info!("Wrote device config to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
