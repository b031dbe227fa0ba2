//! TOML-based scoring configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::io::reference::DEFAULT_TIMESERIES_ROWS;
use crate::sim::types::{CostWeights, MAX_DAYS};

/// Top-level scoring configuration parsed from TOML.
///
/// All fields have defaults matching the published scoring rules. Load from
/// TOML with [`ScoringConfig::from_toml_file`] or use
/// [`ScoringConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Horizon parameters.
    #[serde(default)]
    pub scoring: HorizonConfig,
    /// Cost function weights.
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Reference file layout.
    #[serde(default)]
    pub reference: ReferenceConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Horizon parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    /// Days of the submitted week to score (1..=7).
    pub days: usize,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self { days: MAX_DAYS }
    }
}

/// Cost function weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightsConfig {
    /// Penalty per diesel start.
    pub activation: f64,
    /// Weight per minute of diesel runtime.
    pub diesel_runtime: f64,
    /// Weight per minute of the longest diesel run.
    pub max_diesel_run: f64,
    /// Weight per minute of grid usage.
    pub grid_runtime: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        let w = CostWeights::default();
        Self {
            activation: w.activation,
            diesel_runtime: w.diesel_runtime,
            max_diesel_run: w.max_diesel_run,
            grid_runtime: w.grid_runtime,
        }
    }
}

impl WeightsConfig {
    pub fn to_weights(&self) -> CostWeights {
        CostWeights {
            activation: self.activation,
            diesel_runtime: self.diesel_runtime,
            max_diesel_run: self.max_diesel_run,
            grid_runtime: self.grid_runtime,
        }
    }
}

/// Reference file layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Number of hourly sample rows preceding the site rows.
    pub timeseries_rows: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            timeseries_rows: DEFAULT_TIMESERIES_ROWS,
        }
    }
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"scoring.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScoringConfig {
    /// Returns the published scoring rules.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let days = self.scoring.days;
        if !(1..=MAX_DAYS).contains(&days) {
            errors.push(ConfigError {
                field: "scoring.days".into(),
                message: format!("must be in [1, {MAX_DAYS}], got {days}"),
            });
        }

        let w = &self.weights;
        for (field, value) in [
            ("weights.activation", w.activation),
            ("weights.diesel_runtime", w.diesel_runtime),
            ("weights.max_diesel_run", w.max_diesel_run),
            ("weights.grid_runtime", w.grid_runtime),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be a finite number >= 0".into(),
                });
            }
        }

        if self.logging.level.trim().is_empty() {
            errors.push(ConfigError {
                field: "logging.level".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }
}
