//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api;
pub mod logging;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "NTC";

/// Root client configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + profile overlay) and `NTC__` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Backend API settings.
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,
    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from TOML files under `config_dir`.
    ///
    /// Merges `default.toml` with the `{profile}.toml` overlay and
    /// environment variables prefixed with `NTC__` (e.g.
    /// `NTC__API__BASE_URL`). Missing files are skipped.
    pub fn load(config_dir: impl AsRef<Path>, profile: &str) -> Result<Self, AppError> {
        let dir = config_dir.as_ref();
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join(profile)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }
}
