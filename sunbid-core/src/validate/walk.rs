//! Row-walk validation strategy.
//!
//! Walks the raw items one by one: serde enforces the closed key set and
//! numeric values, the calendar enforces the exact instant sequence.

use serde_json::Value;
use tracing::error;

use super::context::ValidationContext;
use crate::calendar::day_boundaries;
use crate::domain::{RawPoint, VolumeSample};

pub(crate) fn validate_walk(series: &[Value], ctx: &ValidationContext) -> bool {
    // Structural/range pass. The count bounds here are DST-tolerant
    // (23h..25h worth of samples); the temporal pass below pins the
    // exact count once the day length is known.
    let n = series.len();
    if n < ctx.min_expected() || n > ctx.max_expected() {
        error!(
            "Schema validation failed: expected between {} and {} items, got {}",
            ctx.min_expected(),
            ctx.max_expected(),
            n
        );
        return false;
    }

    let mut samples: Vec<VolumeSample> = Vec::with_capacity(n);
    for (i, item) in series.iter().enumerate() {
        let point: RawPoint = match serde_json::from_value(item.clone()) {
            Ok(p) => p,
            Err(e) => {
                error!("Schema validation failed at item {i}: {e}");
                return false;
            }
        };
        let sample = match point.to_sample() {
            Ok(s) => s,
            Err(e) => {
                error!("Schema validation failed at item {i}: {e}");
                return false;
            }
        };
        if sample.value < ctx.mini() || sample.value > ctx.maxi() {
            error!(
                "Schema validation failed at item {i}: data {} outside [{}, {}]",
                sample.value,
                ctx.mini(),
                ctx.maxi()
            );
            return false;
        }
        samples.push(sample);
    }

    // Temporal pass: the series must cover [start, end) exactly, one
    // sample per nominal step, in order. Comparison is between absolute
    // instants, so local-time labels skipping or repeating across a DST
    // transition do not matter here.
    let (start, end) = match day_boundaries(ctx.delivery_date(), ctx.tz()) {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("Cannot resolve day boundaries for {}: {e}", ctx.delivery_date());
            return false;
        }
    };

    let hours = (end - start).num_hours();
    let expected_len = hours as usize * ctx.freq().samples_per_hour();
    if n != expected_len {
        error!(
            "Invalid item count: {n}. Expected {expected_len} for {} on {}",
            ctx.freq(),
            ctx.delivery_date()
        );
        return false;
    }

    let step = ctx.freq().step();
    for (i, sample) in samples.iter().enumerate() {
        let expected = start + step * i as i32;
        if sample.timestamp != expected {
            error!(
                "Timestamps must be exactly {} apart starting from {}: item {i} is {}, expected {}",
                ctx.freq(),
                ctx.delivery_date(),
                sample.timestamp,
                expected
            );
            return false;
        }
    }

    true
}
