//! Simulation Configuration
//!
//! Loads [`SimConfig`] from TOML. Every field is optional; missing ones keep
//! their defaults.
//!
//! ```toml
//! dt = 0.016666668
//!
//! [player]
//! run_speed = 180.0
//! free_fly = true
//! friction = { x = 0.8, y = 1.0 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::game::tick::SimConfig;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for `SimConfig`.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but cannot be simulated.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Parse a TOML string.
pub fn from_toml_str(text: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Load a TOML config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = from_toml_str(&text)?;
    info!("Loaded config {}", path.display());
    Ok(config)
}

fn validate(config: &SimConfig) -> Result<(), ConfigError> {
    if !(config.dt > 0.0 && config.dt.is_finite()) {
        return Err(ConfigError::Invalid(format!("dt must be positive, got {}", config.dt)));
    }
    if config.player.epsilon < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "player.epsilon must not be negative, got {}",
            config.player.epsilon
        )));
    }
    Ok(())
}
