//! TOML configuration for a game session.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use railway_tycoon_core::TuningConfig;
use railway_tycoon_system_generator::GeneratorConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything needed to start and restart a game.
///
/// Every table is optional in the file; missing keys take the shipped values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Grid columns.
    pub width: u32,
    /// Grid rows.
    pub height: u32,
    /// Shift applied to the attack damage curve.
    pub difficulty: u32,
    /// Seed of the session's random source.
    pub seed: u64,
    /// Layout and starting reserves.
    pub generator: GeneratorConfig,
    /// Economy tables.
    pub tuning: TuningConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            difficulty: 0,
            seed: 0,
            generator: GeneratorConfig::default(),
            tuning: TuningConfig::default(),
        }
    }
}

/// Failure to obtain a usable [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read session config at {path}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The contents are not valid TOML for a session.
    #[error("failed to parse session config")]
    Parse(#[from] toml::de::Error),
    /// The grid cannot host the base.
    #[error("grid {width}x{height} cannot hold a base of size {base_size}")]
    InvalidDimensions {
        /// Configured columns.
        width: u32,
        /// Configured rows.
        height: u32,
        /// Configured base side length.
        base_size: u32,
    },
}

impl SessionConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects grids that are empty or too small for the base.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_size = self.generator.base_size;
        if self.width == 0 || self.height == 0 || self.width < base_size || self.height < base_size
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
                base_size,
            });
        }
        Ok(())
    }
}
