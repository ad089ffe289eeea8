use std::path::Path;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_DUE_TOLERANCE_MS, DEFAULT_LOG_LEVEL, DEFAULT_PREVIEW_COUNT,
    DEFAULT_SEARCH_HORIZON_DAYS, DEFAULT_TIMEZONE, ENV_PREFIX,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// IANA zone used when a job or CLI call does not name one.
    pub default_timezone: String,
    /// How far back from "now" an occurrence still counts as due.
    pub due_tolerance_ms: i64,
    /// Cap for next-occurrence searches.
    pub search_horizon_days: i64,
    /// Number of fire times printed by `cadence preview`.
    pub preview_count: usize,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an optional TOML file.
    ///
    /// Environment variables use the `CADENCE_` prefix and `__` between sections,
    /// e.g. `CADENCE_ENGINE__DEFAULT_TIMEZONE`. The file is `cadence.toml` in the
    /// working directory unless `path` names another one, in which case it must exist.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the resulting values fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE_NAME).required(false),
        };

        let settings = Self::defaults()?
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(file)
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Returns a builder pre-populated with every default value.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be set.
    pub fn defaults() -> CoreResult<ConfigBuilder<DefaultState>> {
        let horizon = DEFAULT_SEARCH_HORIZON_DAYS;
        let preview = u64::try_from(DEFAULT_PREVIEW_COUNT)
            .map_err(|e| CoreError::ConfigError(e.to_string()))?;

        Ok(Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("engine.default_timezone", DEFAULT_TIMEZONE)?
            .set_default("engine.due_tolerance_ms", DEFAULT_DUE_TOLERANCE_MS)?
            .set_default("engine.search_horizon_days", horizon)?
            .set_default("engine.preview_count", preview)?)
    }

    /// ## Summary
    /// Checks value ranges that serde cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` naming the first offending key.
    pub fn validate(&self) -> CoreResult<()> {
        if self.engine.due_tolerance_ms < 0 {
            return Err(CoreError::ValidationError(format!(
                "engine.due_tolerance_ms must not be negative, got {}",
                self.engine.due_tolerance_ms
            )));
        }
        if self.engine.search_horizon_days <= 0 {
            return Err(CoreError::ValidationError(format!(
                "engine.search_horizon_days must be positive, got {}",
                self.engine.search_horizon_days
            )));
        }
        if self.engine.preview_count == 0 {
            return Err(CoreError::ValidationError(
                "engine.preview_count must be positive".to_string(),
            ));
        }
        if self.engine.default_timezone.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "engine.default_timezone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(path: Option<&Path>) -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load(path)?;
    tracing::debug!(?settings, "Settings loaded");
    Ok(settings)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
