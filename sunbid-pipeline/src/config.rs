//! Serializable pipeline configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use sunbid_core::client::Environment;
use sunbid_core::domain::{area_strict, OrderHeader};
use sunbid_core::transform::ContractNumbering;
use sunbid_core::validate::{ContextError, Frequency};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Configuration for one day-ahead bidding run.
///
/// This struct captures all parameters needed to reproduce a run:
/// - Which installation's forecast to fetch, and at what resolution
/// - How to validate it (value bounds)
/// - How to turn it into an order (product, area, portfolio, numbering)
/// - Which auction environment receives the order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Installation name or client id on the forecast side.
    pub installation: String,

    /// Series frequency: "1h" or "15min".
    pub frequency: String,

    /// Traded product, e.g. "CWE_H_DA_1".
    pub product_id: String,

    /// Delivery area code, e.g. "FR".
    pub area_code: String,

    /// Portfolio the order is booked on.
    #[serde(default)]
    pub portfolio: Option<String>,

    /// Free-text comment attached to the order.
    #[serde(default)]
    pub comment: Option<String>,

    /// Contract numbering scheme.
    #[serde(default = "default_numbering")]
    pub numbering: ContractNumbering,

    /// Smallest admissible forecast value (kWh).
    pub mini: f64,

    /// Largest admissible forecast value (kWh).
    pub maxi: f64,

    /// Auction environment to submit against.
    #[serde(default)]
    pub environment: Environment,
}

fn default_numbering() -> ContractNumbering {
    ContractNumbering::SameDay
}

impl PipelineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.check()?;
        Ok(config)
    }

    /// Cross-field checks that serde cannot express.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.frequency()?;
        area_strict(&self.area_code)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.product_id.is_empty() {
            return Err(ConfigError::Invalid("product_id must not be empty".into()));
        }
        if !(0.0 <= self.mini && self.mini <= self.maxi) {
            return Err(ConfigError::Invalid(format!(
                "mini/maxi must satisfy 0 <= mini <= maxi, got mini={}, maxi={}",
                self.mini, self.maxi
            )));
        }
        Ok(())
    }

    pub fn frequency(&self) -> Result<Frequency, ConfigError> {
        self.frequency
            .parse::<Frequency>()
            .map_err(|e: ContextError| ConfigError::Invalid(e.to_string()))
    }

    /// Order header assembled from the config fields.
    pub fn order_header(&self) -> OrderHeader {
        OrderHeader {
            product_id: self.product_id.clone(),
            area_code: self.area_code.clone(),
            portfolio: self.portfolio.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// Forecast-service credentials, read from the environment so they never
/// live in config files.
#[derive(Debug, Clone)]
pub struct StreemCredentials {
    pub username: String,
    pub password: String,
}

impl StreemCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: require_env("STREEM_USERNAME")?,
            password: require_env("STREEM_PASSWORD")?,
        })
    }
}

/// Auction-service credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct NordpoolCredentials {
    pub username: String,
    pub password: String,
}

impl NordpoolCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: require_env("NORDPOOL_USERNAME")?,
            password: require_env("NORDPOOL_PASSWORD")?,
        })
    }
}

/// Both credential pairs, for the full submit flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub streem: StreemCredentials,
    pub nordpool: NordpoolCredentials,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            streem: StreemCredentials::from_env()?,
            nordpool: NordpoolCredentials::from_env()?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}
