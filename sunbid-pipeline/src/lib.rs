//! Sunbid Pipeline — day-ahead run orchestration on top of `sunbid-core`.
//!
//! This crate builds on `sunbid-core` to provide:
//! - TOML run configuration and env-based credentials
//! - Source/sink traits over the two external services
//! - The fetch → validate → transform → submit run function
//! - A serializable run report for logs and CLI output

pub mod config;
pub mod runner;

pub use config::{
    ConfigError, Credentials, NordpoolCredentials, PipelineConfig, StreemCredentials,
};
pub use runner::{run_day_ahead, ForecastSource, OrderSink, PipelineReport, RunError};
