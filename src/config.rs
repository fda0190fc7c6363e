//! Check configuration
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration. Command-line flags override file values.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compare::SolverConfig;
use crate::executor::MatchPolicy;
use crate::observability::Severity;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one grading run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Wall-clock budget for one predicted/reference pair (default 30s)
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: f64,

    /// Match policy name (default "exact_match")
    #[serde(default = "default_method")]
    pub method: String,

    /// Rejoin split comparison operators in predicted text (default false)
    #[serde(default)]
    pub normalize_operators: bool,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Permutation solver tuning
    #[serde(default)]
    pub solver: SolverConfig,
}

fn default_deadline_secs() -> f64 {
    30.0
}
fn default_method() -> String {
    MatchPolicy::Exact.as_str().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline_secs(),
            method: default_method(),
            normalize_operators: false,
            log_level: default_log_level(),
            solver: SolverConfig::default(),
        }
    }
}

impl CheckConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: CheckConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        self.deadline()?;
        self.match_policy()?;
        self.severity()?;

        if self.solver.sample_rows == 0 {
            return Err(ConfigError::Invalid("solver.sample_rows must be > 0".into()));
        }

        Ok(())
    }

    /// Deadline as a duration
    pub fn deadline(&self) -> ConfigResult<Duration> {
        deadline_from_secs(self.deadline_secs).map_err(ConfigError::Invalid)
    }

    pub fn match_policy(&self) -> ConfigResult<MatchPolicy> {
        self.method
            .parse()
            .map_err(|e: crate::executor::CheckError| ConfigError::Invalid(e.to_string()))
    }

    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }
}

/// Converts a seconds value into a deadline.
///
/// Rejects zero, negative, NaN and infinite values.
pub fn deadline_from_secs(secs: f64) -> Result<Duration, String> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("deadline must be a positive number of seconds, got {}", secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| format!("deadline {} out of range: {}", secs, e))
}
