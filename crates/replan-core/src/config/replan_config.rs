//! Top-level replan configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SearchConfig, TraceConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`REPLAN_*`)
/// 2. Project config (`replan.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReplanConfig {
    pub search: SearchConfig,
    pub trace: TraceConfig,
}

impl ReplanConfig {
    /// Load configuration for a project rooted at `root`.
    ///
    /// A missing `replan.toml` is not an error; malformed TOML or an unparsable
    /// environment override is.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
            debug!(path = %project_config_path.display(), "applied project config");
        }

        let overrides = Self::apply_env_overrides(&mut config)?;
        if overrides > 0 {
            debug!(overrides, "applied environment overrides");
        }
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (no file or env layers).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ReplanConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: "<string>".to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "<root>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ReplanConfig) -> Result<(), ConfigError> {
        if config.search.max_iterations == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "search.max_iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.search.iteration_factor == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "search.iteration_factor".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.search.iteration_floor == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "search.iteration_floor".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.trace.sample_every == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "trace.sample_every".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ReplanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ReplanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut ReplanConfig, other: &ReplanConfig) {
        // Search
        if other.search.max_iterations.is_some() {
            base.search.max_iterations = other.search.max_iterations;
        }
        if other.search.iteration_factor.is_some() {
            base.search.iteration_factor = other.search.iteration_factor;
        }
        if other.search.iteration_floor.is_some() {
            base.search.iteration_floor = other.search.iteration_floor;
        }

        // Trace
        if other.trace.enabled.is_some() {
            base.trace.enabled = other.trace.enabled;
        }
        if other.trace.sample_every.is_some() {
            base.trace.sample_every = other.trace.sample_every;
        }
        if other.trace.snapshots.is_some() {
            base.trace.snapshots = other.trace.snapshots;
        }
    }

    /// Apply environment variable overrides, returning how many were set.
    /// Pattern: `REPLAN_MAX_ITERATIONS`, `REPLAN_TRACE_SAMPLE_EVERY`, etc.
    fn apply_env_overrides(config: &mut ReplanConfig) -> Result<usize, ConfigError> {
        let mut applied = 0;
        if let Some(v) = env_value::<usize>("REPLAN_MAX_ITERATIONS")? {
            config.search.max_iterations = Some(v);
            applied += 1;
        }
        if let Some(v) = env_value::<usize>("REPLAN_ITERATION_FACTOR")? {
            config.search.iteration_factor = Some(v);
            applied += 1;
        }
        if let Some(v) = env_value::<usize>("REPLAN_ITERATION_FLOOR")? {
            config.search.iteration_floor = Some(v);
            applied += 1;
        }
        if let Some(v) = env_value::<bool>("REPLAN_TRACE_ENABLED")? {
            config.trace.enabled = Some(v);
            applied += 1;
        }
        if let Some(v) = env_value::<usize>("REPLAN_TRACE_SAMPLE_EVERY")? {
            config.trace.sample_every = Some(v);
            applied += 1;
        }
        if let Some(v) = env_value::<bool>("REPLAN_TRACE_SNAPSHOTS")? {
            config.trace.snapshots = Some(v);
            applied += 1;
        }
        Ok(applied)
    }
}

/// Read and parse one environment override. Unset variables yield `None`.
fn env_value<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: key.to_string(),
                message: format!("'{raw}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}
