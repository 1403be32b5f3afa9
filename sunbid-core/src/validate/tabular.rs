//! Columnar validation strategy.
//!
//! The bulk counterpart of the row walk: items are pivoted into columns
//! and checked as whole series (key set, numeric dtype, value range,
//! timestamp sequence). Must stay boolean-equivalent to the row walk on
//! every input; that equivalence is pinned by a property test.

use std::collections::BTreeSet;

use polars::prelude::*;
use serde_json::Value;
use tracing::error;

use super::context::ValidationContext;
use crate::calendar::{day_boundaries, parse_timestamp};

pub(crate) fn validate_tabular(series: &[Value], ctx: &ValidationContext) -> bool {
    // Pivot to columns. Anything that is not an object cannot be framed.
    let mut items = Vec::with_capacity(series.len());
    for item in series {
        match item.as_object() {
            Some(obj) => items.push(obj),
            None => {
                error!("Cannot convert volume data to columns: item is not an object");
                return false;
            }
        }
    }

    // Column-set check: exactly 'date' and 'data' across the whole frame.
    let columns: BTreeSet<&str> = items
        .iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    if columns != BTreeSet::from(["date", "data"]) {
        error!("Each item must have exactly 'date' and 'data' keys");
        return false;
    }

    // 'data' column: all numeric.
    let mut datas: Vec<f64> = Vec::with_capacity(items.len());
    for obj in &items {
        match obj.get("data").and_then(Value::as_f64) {
            Some(v) => datas.push(v),
            None => {
                error!("All 'data' values must be numeric");
                return false;
            }
        }
    }
    let data_col = Float64Chunked::from_vec("data".into(), datas);

    // Range check over the whole column.
    let (min, max) = (data_col.min(), data_col.max());
    if min.is_some_and(|v| v < ctx.mini()) || max.is_some_and(|v| v > ctx.maxi()) {
        error!(
            "All 'data' values must be between {} and {}",
            ctx.mini(),
            ctx.maxi()
        );
        return false;
    }

    // 'date' column: parseable, timezone-aware. Held as two columns,
    // epoch seconds plus subsecond nanos, so instants compare at full
    // precision; a single i64 cannot hold the whole nanosecond range.
    let mut secs: Vec<i64> = Vec::with_capacity(items.len());
    let mut nanos: Vec<i64> = Vec::with_capacity(items.len());
    for obj in &items {
        let parsed = obj
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| parse_timestamp(s).ok());
        match parsed {
            Some(dt) => {
                secs.push(dt.timestamp());
                nanos.push(dt.timestamp_subsec_nanos() as i64);
            }
            None => {
                error!("All 'date' values must be valid ISO 8601 timestamps with timezone");
                return false;
            }
        }
    }
    let secs_col = Int64Chunked::from_vec("date_secs".into(), secs).into_series();
    let nanos_col = Int64Chunked::from_vec("date_nanos".into(), nanos).into_series();

    let (start, end) = match day_boundaries(ctx.delivery_date(), ctx.tz()) {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("Cannot resolve day boundaries for {}: {e}", ctx.delivery_date());
            return false;
        }
    };

    // Exact count for this specific day.
    let hours = (end - start).num_hours();
    let expected_len = hours as usize * ctx.freq().samples_per_hour();
    if secs_col.len() != expected_len {
        error!(
            "Invalid item count: {}. Expected {expected_len} for {} on {}",
            secs_col.len(),
            ctx.freq(),
            ctx.delivery_date()
        );
        return false;
    }

    // Bulk sequence check: both columns must equal the expected grid.
    let step = ctx.freq().step();
    let mut expected_secs: Vec<i64> = Vec::with_capacity(expected_len);
    let mut expected_nanos: Vec<i64> = Vec::with_capacity(expected_len);
    for i in 0..expected_len {
        let instant = start + step * i as i32;
        expected_secs.push(instant.timestamp());
        expected_nanos.push(instant.timestamp_subsec_nanos() as i64);
    }
    let expected_secs_col = Int64Chunked::from_vec("date_secs".into(), expected_secs).into_series();
    let expected_nanos_col =
        Int64Chunked::from_vec("date_nanos".into(), expected_nanos).into_series();

    if !secs_col.equals(&expected_secs_col) || !nanos_col.equals(&expected_nanos_col) {
        error!(
            "Timestamps must be exactly {} apart starting from {}",
            ctx.freq(),
            ctx.delivery_date()
        );
        return false;
    }

    true
}
