//! Volume-series validation.
//!
//! One public surface over two interchangeable strategies: a per-item row
//! walk and a columnar bulk check. Both verify the same contract — closed
//! `{date, data}` key set, numeric values within the context bounds, and
//! an exact, gap-free instant sequence covering the delivery day boundary
//! to boundary — and must agree on every input.
//!
//! Failures are reported by logging the first violated rule and returning
//! `false`; validation never panics and never returns an error value.
//! This is deliberate: a failed validation is an expected, recoverable
//! outcome for the caller.

pub mod context;
mod tabular;
mod walk;

pub use context::{ContextError, Frequency, ValidationContext};

use serde_json::Value;

/// Validation strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Per-item schema walk and date-sequence comparison.
    #[default]
    RowWalk,
    /// Columnar bulk check over pivoted series.
    Columnar,
}

/// Validate a raw series against a context using the default strategy.
pub fn validate(series: &[Value], ctx: &ValidationContext) -> bool {
    validate_with(series, ctx, Strategy::default())
}

/// Validate with an explicit strategy. Both strategies are behaviorally
/// equivalent; the choice only matters for performance characteristics.
pub fn validate_with(series: &[Value], ctx: &ValidationContext, strategy: Strategy) -> bool {
    match strategy {
        Strategy::RowWalk => walk::validate_walk(series, ctx),
        Strategy::Columnar => tabular::validate_tabular(series, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{day_boundaries, MARKET_TZ};
    use serde_json::json;

    fn hourly_series(day: &str) -> Vec<Value> {
        let (start, end) = day_boundaries(day, MARKET_TZ).unwrap();
        let hours = (end - start).num_hours();
        (0..hours)
            .map(|h| {
                json!({
                    "date": (start + chrono::Duration::hours(h)).to_rfc3339(),
                    "data": 1000.0 + h as f64,
                })
            })
            .collect()
    }

    fn ctx(day: &str) -> ValidationContext {
        ValidationContext::new(day, "1h", 0.0, 10_000.0, MARKET_TZ).unwrap()
    }

    #[test]
    fn valid_hourly_day_passes_both_strategies() {
        let series = hourly_series("2025-05-20");
        assert_eq!(series.len(), 24);
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(validate_with(&series, &ctx("2025-05-20"), strategy), "{strategy:?}");
        }
    }

    #[test]
    fn dst_days_require_their_exact_count() {
        // 23 samples on the spring transition day, 25 on the autumn one.
        let spring = hourly_series("2025-03-30");
        assert_eq!(spring.len(), 23);
        let autumn = hourly_series("2025-10-26");
        assert_eq!(autumn.len(), 25);
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(validate_with(&spring, &ctx("2025-03-30"), strategy));
            assert!(validate_with(&autumn, &ctx("2025-10-26"), strategy));
            // A 24-sample series is within the tolerant bounds but wrong
            // for these specific days.
            assert!(!validate_with(&hourly_series("2025-05-20"), &ctx("2025-03-30"), strategy));
            assert!(!validate_with(&hourly_series("2025-05-20"), &ctx("2025-10-26"), strategy));
        }
    }

    #[test]
    fn empty_series_fails() {
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&[], &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn extra_key_fails() {
        let mut series = hourly_series("2025-05-20");
        let (date, data) = (series[3]["date"].clone(), series[3]["data"].clone());
        series[3] = json!({"date": date, "data": data, "unit": "kWh"});
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn missing_key_fails() {
        let mut series = hourly_series("2025-05-20");
        let date = series[7]["date"].clone();
        series[7] = json!({"date": date});
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn out_of_range_value_fails() {
        let mut series = hourly_series("2025-05-20");
        series[0]["data"] = json!(10_000.1);
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn boundary_values_pass() {
        let mut series = hourly_series("2025-05-20");
        series[0]["data"] = json!(0.0);
        series[1]["data"] = json!(10_000.0);
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn non_numeric_data_fails() {
        let mut series = hourly_series("2025-05-20");
        series[5]["data"] = json!("1000.0");
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn shifted_timestamp_fails() {
        let mut series = hourly_series("2025-05-20");
        // Move one sample 15 minutes off the hourly grid.
        series[10]["date"] = json!("2025-05-20T10:15:00+02:00");
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn sub_second_shift_fails_both_strategies() {
        // A fractional-second offset is valid parser input but off the
        // grid; instants must compare at full precision, not truncated
        // to some coarser unit.
        let mut series = hourly_series("2025-05-20");
        series[10]["date"] = json!("2025-05-20T10:00:00.0001+02:00");
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy), "{strategy:?}");
        }
    }

    #[test]
    fn reordered_series_fails() {
        let mut series = hourly_series("2025-05-20");
        series.swap(4, 5);
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn utc_labelled_series_still_matches_local_grid() {
        // Same instants expressed in UTC instead of the civil zone:
        // equality is between instants, not labels.
        let (start, end) = day_boundaries("2025-05-20", MARKET_TZ).unwrap();
        let hours = (end - start).num_hours();
        let series: Vec<Value> = (0..hours)
            .map(|h| {
                json!({
                    "date": (start + chrono::Duration::hours(h))
                        .with_timezone(&chrono::Utc)
                        .to_rfc3339(),
                    "data": 500.0,
                })
            })
            .collect();
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(validate_with(&series, &ctx("2025-05-20"), strategy));
        }
    }

    #[test]
    fn quarter_hourly_day_passes() {
        let (start, end) = day_boundaries("2025-05-20", MARKET_TZ).unwrap();
        let minutes = (end - start).num_minutes();
        let series: Vec<Value> = (0..minutes / 15)
            .map(|i| {
                json!({
                    "date": (start + chrono::Duration::minutes(15 * i)).to_rfc3339(),
                    "data": 250.0,
                })
            })
            .collect();
        assert_eq!(series.len(), 96);
        let ctx = ValidationContext::new("2025-05-20", "15min", 0.0, 10_000.0, MARKET_TZ).unwrap();
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(validate_with(&series, &ctx, strategy));
        }
        // Hourly data against a quarter-hourly context must fail.
        let hourly = hourly_series("2025-05-20");
        for strategy in [Strategy::RowWalk, Strategy::Columnar] {
            assert!(!validate_with(&hourly, &ctx, strategy));
        }
    }
}
