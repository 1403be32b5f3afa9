//! Volume series → bid-curve order transformation.
//!
//! Converts a raw forecast series (kWh per delivery interval) into the
//! auction API's curve-order payload: unit conversion, trade-lot rounding,
//! contract-id generation, and the fixed 4-point curve per interval.
//!
//! Error signalling here is deliberately different from the validator:
//! the transformer returns a tagged `{"error": "..."}` value instead of
//! logging, so callers can inspect and display the reason. Both
//! conventions are part of the public contract.

use chrono::{Duration, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::calendar::parse_timestamp;
use crate::domain::{Curve, CurveOrder, CurvePoint, OrderHeader};

/// Which delivery date a contract id encodes.
///
/// Two numbering schemes coexist for different call sites and they are
/// not interchangeable, so the caller must always pick one explicitly:
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractNumbering {
    /// Contract date = the interval's own local calendar date
    /// (intraday-style numbering).
    SameDay,
    /// Contract date = the day after the interval's local date
    /// (day-ahead numbering: delivery is the day after the auction).
    NextDay,
}

/// Transformer error: a single human-readable string, serialized as the
/// one-key `{"error": "..."}` object the callers expect on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct TransformError {
    pub error: String,
}

impl TransformError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Transform a raw volume series into a curve order.
///
/// Per item, in input order: parse the interval-start timestamp, convert
/// kWh to MWh (divide by 1000), round to the 0.1 MWh trade lot, derive
/// the contract id, and attach the fixed 4-point curve. The first
/// malformed item fails the whole call — no partial payloads.
///
/// Rounding uses `f64::round` (half away from zero). This is
/// settlement-adjacent output, so the mode is part of the contract and
/// must not drift.
pub fn to_curve_order(
    series: &[Value],
    header: &OrderHeader,
    numbering: ContractNumbering,
    tz: Tz,
) -> Result<CurveOrder, TransformError> {
    if series.is_empty() {
        return Err(TransformError::new("Input data is empty"));
    }

    // Auction id comes from the first interval's local delivery date.
    let first_date = series[0]
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| TransformError::new("First datapoint must have a 'date' attribute"))?;
    let first = parse_timestamp(first_date).map_err(|e| {
        TransformError::new(format!(
            "Invalid date or volume format in entry {first_date}: {e}"
        ))
    })?;
    let auction_date = first.with_timezone(&tz).format("%Y%m%d");
    let auction_id = format!("{}-{auction_date}", header.product_id);

    let mut curves = Vec::with_capacity(series.len());
    for item in series {
        let (date_str, raw_volume) = match split_entry(item) {
            Ok(parts) => parts,
            Err(cause) => {
                return Err(TransformError::new(format!(
                    "Invalid date or volume format in entry {item}: {cause}"
                )))
            }
        };
        let instant = match parse_timestamp(date_str) {
            Ok(dt) => dt,
            Err(e) => {
                return Err(TransformError::new(format!(
                    "Invalid date or volume format in entry {item}: {e}"
                )))
            }
        };

        // kWh → MWh, rounded to the 0.1 MWh trade lot.
        let volume = (raw_volume / 1000.0 * 10.0).round() / 10.0;

        let local = instant.with_timezone(&tz);
        let contract_date = match numbering {
            ContractNumbering::SameDay => local.date_naive(),
            ContractNumbering::NextDay => local.date_naive() + Duration::days(1),
        };
        // Interval index is 1-based: local hour 0 is contract 01.
        // TODO: disambiguate the repeated local hour on the autumn
        // fall-back day; both 02:00 instants currently collide onto the
        // same contract id.
        let contract_id = format!(
            "{}-{}-{:02}",
            header.product_id,
            contract_date.format("%Y%m%d"),
            local.hour() + 1
        );

        curves.push(Curve {
            contract_id,
            curve_points: fixed_curve(volume),
        });
    }

    Ok(CurveOrder {
        auction_id,
        portfolio: header.portfolio.clone(),
        area_code: header.area_code.clone(),
        comment: header.comment.clone(),
        curves,
    })
}

fn split_entry(item: &Value) -> Result<(&str, f64), String> {
    let obj = item.as_object().ok_or("Entry must be an object")?;
    let date = obj
        .get("date")
        .ok_or("Missing 'date' key")?
        .as_str()
        .ok_or("Date must be a string")?;
    let data = obj
        .get("data")
        .ok_or("Missing 'data' key")?
        .as_f64()
        .ok_or("Volume must be a number")?;
    Ok((date, data))
}

/// The fixed price ladder: two zero-volume anchors, then the (negated)
/// traded volume at 0.00 and at the price cap.
fn fixed_curve(volume: f64) -> Vec<CurvePoint> {
    // Negating 0.0 would serialize as -0.0 on the wire; keep it positive.
    let neg = if volume == 0.0 { 0.0 } else { -volume };
    vec![
        CurvePoint { price: -500.00, volume: 0.00 },
        CurvePoint { price: -0.01, volume: 0.00 },
        CurvePoint { price: 0.00, volume: neg },
        CurvePoint { price: 4000.00, volume: neg },
    ]
}
