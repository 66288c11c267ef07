//! Startup configuration, loaded once from TOML.
//!
//! ```toml
//! [handshake]
//! wait_interval_ms = 50
//! missed_cycle_limit = 40
//!
//! [events]
//! capacity = 64
//! drain_budget = 16
//!
//! [display]
//! name = "PRISM HMD"
//! capabilities = "ORIENTATION | PRESENT"
//! eye_resolution = [1440, 1600]
//! ```
//!
//! Every section is optional; an empty file yields the defaults.

use std::path::Path;

use prism_bridge::HandshakeConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::display::DisplayDescriptor;
use crate::events::EventQueueConfig;

/// Failures while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrismConfig {
    /// Frame-request handshake tuning.
    pub handshake: HandshakeConfig,
    /// Gesture queue sizing.
    pub events: EventQueueConfig,
    /// Device descriptor applied at startup, when discovery is static.
    pub display: Option<DisplayDescriptor>,
}

impl PrismConfig {
    /// Loads and parses `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}
