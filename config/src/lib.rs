//! Configuration for Corral.
//!
//! Read from `~/.corral/config.toml` unless `CORRAL_CONFIG` names another
//! file. A missing file is not an error; every field has a default.
//!
//! ```toml
//! [app]
//! log_filter = "corral_engine=debug"
//! json = false
//!
//! [store]
//! capacity_hint = 64
//! ```

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;
use toml::de::Error as TomlError;

use corral_engine::StoreOptions;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "CORRAL_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorralConfig {
    pub app: Option<AppConfig>,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {error}", .path.display())]
    Read {
        path: PathBuf,
        error: io::Error,
    },
    #[error("failed to parse config at {}: {error}", .path.display())]
    Parse {
        path: PathBuf,
        error: TomlError,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// `tracing` filter directive used when `CORRAL_LOG` is unset.
    pub log_filter: Option<String>,
    /// Print run reports as JSON by default.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Cells to reserve up front in each new store.
    pub capacity_hint: Option<usize>,
}

impl CorralConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    error: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    error: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn log_filter(&self) -> Option<&str> {
        self.app.as_ref()?.log_filter.as_deref()
    }

    #[must_use]
    pub fn json(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.json)
    }

    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        let hint = self
            .store
            .as_ref()
            .and_then(|store| store.capacity_hint)
            .unwrap_or_default();
        StoreOptions::default().with_capacity_hint(hint)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".corral").join("config.toml"))
}
