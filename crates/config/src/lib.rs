#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for ccbuild
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/ccbuild/config.toml)
//! - Environment variables

pub mod constants;
pub mod sections;

pub use sections::{RecipeConfig, StreamConfig};

use ccbuild_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub recipe: RecipeConfig,

    #[serde(default)]
    pub stream: StreamConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("ccbuild").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// holds out-of-range values.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::from(e)
            }
        })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!(
                "no config at {}, using defaults",
                config_path.display()
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // CCBUILD_LABEL_PREFIX
        if let Ok(prefix) = std::env::var("CCBUILD_LABEL_PREFIX") {
            self.recipe.label_prefix = prefix;
        }

        // CCBUILD_VERSION
        if let Ok(version) = std::env::var("CCBUILD_VERSION") {
            self.recipe.version = version;
        }

        // CCBUILD_BASE_VERSION
        if let Ok(base_version) = std::env::var("CCBUILD_BASE_VERSION") {
            self.recipe.base_version = base_version;
        }

        // CCBUILD_CONTEXT_BUFFER
        if let Ok(chunks) = std::env::var("CCBUILD_CONTEXT_BUFFER") {
            self.stream.buffer_chunks = chunks.parse().map_err(|_| ConfigError::InvalidValue {
                field: "CCBUILD_CONTEXT_BUFFER".to_string(),
                value: chunks,
            })?;
        }

        // CCBUILD_COMPRESSION_LEVEL
        if let Ok(level) = std::env::var("CCBUILD_COMPRESSION_LEVEL") {
            self.stream.compression_level =
                level.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "CCBUILD_COMPRESSION_LEVEL".to_string(),
                    value: level,
                })?;
        }

        self.validate()
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if the stream buffer is empty or the compression level
    /// is above 9.
    pub fn validate(&self) -> Result<(), Error> {
        if self.stream.buffer_chunks == 0 {
            return Err(ConfigError::InvalidValue {
                field: "stream.buffer_chunks".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.stream.compression_level > 9 {
            return Err(ConfigError::InvalidValue {
                field: "stream.compression_level".to_string(),
                value: self.stream.compression_level.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
