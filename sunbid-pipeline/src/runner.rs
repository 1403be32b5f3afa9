//! Day-ahead run orchestration — wires together fetch, validation,
//! transformation, and submission.
//!
//! The two external services sit behind traits so the whole run is
//! testable against mocks; the live clients implement them directly.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use sunbid_core::calendar::{day_boundaries, tomorrow_str, CalendarError, MARKET_TZ};
use sunbid_core::client::{
    AuctionClient, ForecastType, NordpoolError, Resolution, StreemClient, StreemError,
};
use sunbid_core::domain::CurveOrder;
use sunbid_core::transform::{to_curve_order, TransformError};
use sunbid_core::validate::{validate, Frequency, ValidationContext};

use crate::config::{ConfigError, PipelineConfig};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("forecast source error: {0}")]
    Source(#[source] anyhow::Error),

    #[error("forecast for {delivery_date} failed validation")]
    ValidationFailed { delivery_date: String },

    #[error("transformation error: {0}")]
    Transform(#[from] TransformError),

    #[error("order sink error: {0}")]
    Sink(#[source] anyhow::Error),
}

/// Where forecast series come from.
pub trait ForecastSource {
    fn fetch(
        &self,
        installation: &str,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        frequency: Frequency,
    ) -> anyhow::Result<Vec<Value>>;
}

/// Where finished orders go.
pub trait OrderSink {
    /// Submit an order; returns the remote order id when the service
    /// reports one.
    fn submit(&self, order: &CurveOrder) -> anyhow::Result<Option<String>>;
}

/// Outcome summary of one run, serializable for logs and CLI output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineReport {
    pub delivery_date: String,
    pub auction_id: String,
    pub curve_count: usize,
    pub dry_run: bool,
    /// Remote order id; absent on dry runs and on sinks that do not
    /// report one.
    pub order_id: Option<String>,
}

/// Run the day-ahead flow: fetch the delivery day's forecast, validate
/// it, transform it into a curve order, and submit unless `dry_run`.
///
/// `delivery_date` defaults to tomorrow in the market timezone. A
/// validation failure aborts the run before any order is built.
pub fn run_day_ahead(
    config: &PipelineConfig,
    source: &dyn ForecastSource,
    sink: &dyn OrderSink,
    delivery_date: Option<&str>,
    dry_run: bool,
) -> Result<PipelineReport, RunError> {
    let delivery_date = match delivery_date {
        Some(d) => d.to_string(),
        None => tomorrow_str(MARKET_TZ),
    };
    let frequency = config.frequency()?;

    let ctx = ValidationContext::new(&delivery_date, &config.frequency, config.mini, config.maxi, MARKET_TZ)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    let (start, end) = day_boundaries(&delivery_date, MARKET_TZ)?;

    info!(
        "fetching {} forecast for {} ({delivery_date})",
        frequency, config.installation
    );
    let series = source
        .fetch(&config.installation, start, end, frequency)
        .map_err(RunError::Source)?;

    if !validate(&series, &ctx) {
        return Err(RunError::ValidationFailed { delivery_date });
    }

    let order = to_curve_order(&series, &config.order_header(), config.numbering, MARKET_TZ)?;
    info!(
        "built order {} with {} curves",
        order.auction_id,
        order.curves.len()
    );

    let order_id = if dry_run {
        None
    } else {
        sink.submit(&order).map_err(RunError::Sink)?
    };

    Ok(PipelineReport {
        delivery_date,
        auction_id: order.auction_id.clone(),
        curve_count: order.curves.len(),
        dry_run,
        order_id,
    })
}

impl ForecastSource for StreemClient {
    fn fetch(
        &self,
        installation: &str,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        frequency: Frequency,
    ) -> anyhow::Result<Vec<Value>> {
        let resolution = match frequency {
            Frequency::Hourly => Resolution::Hour,
            Frequency::QuarterHourly => Resolution::QuarterHour,
        };
        let series = self
            .forecast(
                installation,
                ForecastType::Generation,
                start.fixed_offset(),
                end.fixed_offset(),
                resolution,
            )
            .map_err(|e: StreemError| anyhow::Error::new(e))?;
        Ok(series)
    }
}

impl OrderSink for AuctionClient {
    fn submit(&self, order: &CurveOrder) -> anyhow::Result<Option<String>> {
        let receipt = self
            .submit_curve_order(order)
            .map_err(|e: NordpoolError| anyhow::Error::new(e))?;
        Ok(receipt.order_id)
    }
}
