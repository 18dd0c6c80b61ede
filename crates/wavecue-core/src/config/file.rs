//! Reading and writing `ViewerConfig` as YAML

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::ViewerConfig;

/// Errors reading or writing a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("Failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ViewerConfig {
    /// Parse YAML and clamp the result into usable ranges
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: ViewerConfig = serde_yaml::from_str(yaml)?;
        config.validate();
        Ok(config)
    }

    /// Read and validate `path`
    ///
    /// A missing file is not an error and yields the defaults. Unreadable or
    /// malformed files are.
    pub fn try_load(path: &Path) -> ConfigResult<Self> {
        let yaml = match std::fs::read_to_string(path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::from_yaml(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Like `try_load`, but a broken file logs a warning and yields defaults
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            log::warn!("{}, using defaults", e);
            Self::default()
        })
    }

    /// Write as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(ConfigError::Encode)?;
        std::fs::write(path, yaml).map_err(write_error)?;
        log::info!("Saved config to {:?}", path);
        Ok(())
    }
}
