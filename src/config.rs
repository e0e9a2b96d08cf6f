//! Configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `OBJMGR_`-prefixed environment variables (e.g. `OBJMGR_HIDE_OFFSET=20000`).

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default displacement applied on every axis when hiding an object
pub const DEFAULT_HIDE_OFFSET: f64 = 10000.0;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "OBJMGR_";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("hide_offset must be finite and greater than zero, got {0}")]
    InvalidHideOffset(f64),
}

/// Object manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Displacement subtracted from each axis of a hidden object's position
    pub hide_offset: f64,
    /// Whether operations invalidate the path graph when the caller doesn't say
    pub update_path_graph: bool,
    /// tracing filter directive used by the binary
    pub log_filter: String,
    /// Emit JSON log lines instead of human-readable text
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hide_offset: DEFAULT_HIDE_OFFSET,
            update_path_graph: true,
            log_filter: "objmgr=info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Build the figment for this configuration
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, an optional file and the environment
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(file))
    }

    /// Extract and validate a configuration
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make hidden objects unrecoverable.
    ///
    /// A zero offset leaves hidden objects in place; a non-finite one turns
    /// their position into infinities and then NaN on unhide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.hide_offset.is_finite() || self.hide_offset <= 0.0 {
            return Err(ConfigError::InvalidHideOffset(self.hide_offset));
        }
        Ok(())
    }

    /// Set the hide offset. Call [`validate`](Self::validate) on configs
    /// built by hand.
    pub fn with_hide_offset(mut self, offset: f64) -> Self {
        self.hide_offset = offset;
        self
    }

    /// Set the default path graph behaviour
    pub fn with_update_path_graph(mut self, update: bool) -> Self {
        self.update_path_graph = update;
        self
    }
}
