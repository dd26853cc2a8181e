//! Configuration management for the enrolment dashboard

use crate::types::Capacity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `AADHAAR_API__BASE_URL`
pub const ENV_PREFIX: &str = "AADHAAR";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analytics API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// What-if capacity control configuration
    #[serde(default)]
    pub capacity: CapacityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base origin every endpoint is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Bounds of the operator capacity control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Capacity at startup
    #[serde(default = "default_capacity")]
    pub default: u32,

    /// Smallest selectable capacity
    #[serde(default = "default_capacity_min")]
    pub min: u32,

    /// Largest selectable capacity
    #[serde(default = "default_capacity_max")]
    pub max: u32,

    /// Control increment
    #[serde(default = "default_capacity_step")]
    pub step: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://aadhar-prediction-center-allocation-ctuc.onrender.com".to_string()
}

fn default_user_agent() -> String {
    format!("aadhaar-dashboard/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_capacity() -> u32 {
    Capacity::DEFAULT
}

const fn default_capacity_min() -> u32 {
    Capacity::MIN
}

const fn default_capacity_max() -> u32 {
    Capacity::MAX
}

const fn default_capacity_step() -> u32 {
    Capacity::STEP
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            default: default_capacity(),
            min: default_capacity_min(),
            max: default_capacity_max(),
            step: default_capacity_step(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl CapacityConfig {
    /// Check a value the way the operator control would
    ///
    /// # Errors
    ///
    /// Returns a validation error when `value` is outside `min..=max` or is
    /// not reachable from `min` in whole steps.
    pub fn control_value(&self, value: u32) -> crate::Result<Capacity> {
        if value < self.min || value > self.max {
            return Err(crate::Error::validation(
                "capacity",
                format!("{value} is outside {}..={}", self.min, self.max),
            ));
        }
        if self.step > 0 && (value - self.min) % self.step != 0 {
            return Err(crate::Error::validation(
                "capacity",
                format!("{value} is not a multiple of {} above {}", self.step, self.min),
            ));
        }
        Capacity::new(value)
    }

    /// Startup capacity
    ///
    /// # Errors
    ///
    /// Returns a validation error when the configured default is zero.
    pub fn initial(&self) -> crate::Result<Capacity> {
        Capacity::new(self.default)
    }
}

impl Config {
    /// Load configuration from `dashboard.*` in the working directory and
    /// `AADHAAR_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("dashboard").required(false))
    }

    /// Load configuration from an explicit file, environment still applies
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first violated constraint.
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(crate::Error::configuration("api.base_url must not be empty"));
        }
        let capacity = &self.capacity;
        if capacity.min == 0 || capacity.min > capacity.max {
            return Err(crate::Error::configuration(format!(
                "capacity bounds {}..={} are invalid",
                capacity.min, capacity.max
            )));
        }
        if capacity.default == 0 {
            return Err(crate::Error::configuration("capacity.default must be greater than zero"));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(crate::Error::configuration(format!(
                "logging.format must be json or pretty, got {}",
                self.logging.format
            )));
        }
        Ok(())
    }
}
