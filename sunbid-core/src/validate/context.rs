//! Immutable validation configuration for one delivery day.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use thiserror::Error;

use crate::calendar::is_calendar_date_format;

/// Sampling frequency of a volume series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// One sample per hour (`"1h"`).
    Hourly,
    /// Four samples per hour (`"15min"`).
    QuarterHourly,
}

impl Frequency {
    pub fn samples_per_hour(self) -> usize {
        match self {
            Frequency::Hourly => 1,
            Frequency::QuarterHourly => 4,
        }
    }

    /// Nominal interval between consecutive samples.
    pub fn step(self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
            Frequency::QuarterHourly => Duration::minutes(15),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Hourly => write!(f, "1h"),
            Frequency::QuarterHourly => write!(f, "15min"),
        }
    }
}

impl FromStr for Frequency {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(Frequency::Hourly),
            "15min" => Ok(Frequency::QuarterHourly),
            other => Err(ContextError::Frequency(other.to_string())),
        }
    }
}

/// Construction errors, one variant per violated invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("delivery_date must be in 'YYYY-MM-DD' format, got '{0}'")]
    DeliveryDate(String),

    #[error("freq must be one of '1h' or '15min', got '{0}'")]
    Frequency(String),

    #[error("mini/maxi must satisfy 0 <= mini <= maxi, got mini={mini}, maxi={maxi}")]
    Bounds { mini: f64, maxi: f64 },
}

/// Validation context: delivery date, frequency, admissible value range,
/// and the civil timezone of the delivery calendar.
///
/// Construction is the validation boundary — the checks run in order
/// (date format, frequency, bounds) and the first violation fails the
/// whole construction. There are no partial contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    delivery_date: String,
    freq: Frequency,
    mini: f64,
    maxi: f64,
    tz: Tz,
}

impl ValidationContext {
    pub fn new(
        delivery_date: &str,
        freq: &str,
        mini: f64,
        maxi: f64,
        tz: Tz,
    ) -> Result<Self, ContextError> {
        if !is_calendar_date_format(delivery_date)
            || NaiveDate::parse_from_str(delivery_date, "%Y-%m-%d").is_err()
        {
            return Err(ContextError::DeliveryDate(delivery_date.to_string()));
        }

        let freq = freq.parse::<Frequency>()?;

        if !(0.0 <= mini && mini <= maxi) {
            return Err(ContextError::Bounds { mini, maxi });
        }

        Ok(Self {
            delivery_date: delivery_date.to_string(),
            freq,
            mini,
            maxi,
            tz,
        })
    }

    pub fn delivery_date(&self) -> &str {
        &self.delivery_date
    }

    pub fn freq(&self) -> Frequency {
        self.freq
    }

    pub fn mini(&self) -> f64 {
        self.mini
    }

    pub fn maxi(&self) -> f64 {
        self.maxi
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Smallest admissible item count before the exact day length is
    /// known: a 23-hour spring DST day.
    pub fn min_expected(&self) -> usize {
        23 * self.freq.samples_per_hour()
    }

    /// Largest admissible item count: a 25-hour autumn DST day.
    pub fn max_expected(&self) -> usize {
        25 * self.freq.samples_per_hour()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MARKET_TZ;

    #[test]
    fn valid_context_builds() {
        let ctx = ValidationContext::new("2025-05-20", "1h", 0.0, 10_000.0, MARKET_TZ).unwrap();
        assert_eq!(ctx.delivery_date(), "2025-05-20");
        assert_eq!(ctx.freq(), Frequency::Hourly);
        assert_eq!(ctx.mini(), 0.0);
        assert_eq!(ctx.maxi(), 10_000.0);
    }

    #[test]
    fn hourly_count_bounds_cover_dst_days() {
        let ctx = ValidationContext::new("2025-05-20", "1h", 0.0, 1.0, MARKET_TZ).unwrap();
        assert_eq!(ctx.min_expected(), 23);
        assert_eq!(ctx.max_expected(), 25);
    }

    #[test]
    fn quarter_hourly_count_bounds_cover_dst_days() {
        let ctx = ValidationContext::new("2025-05-20", "15min", 0.0, 1.0, MARKET_TZ).unwrap();
        assert_eq!(ctx.min_expected(), 92);
        assert_eq!(ctx.max_expected(), 100);
    }

    #[test]
    fn bad_date_format_fails_first() {
        // Bad date AND bad freq: the date check must win.
        let err = ValidationContext::new("2025/05/20", "2h", 0.0, 1.0, MARKET_TZ).unwrap_err();
        assert_eq!(err, ContextError::DeliveryDate("2025/05/20".into()));

        for bad in ["2025-5-20", "20250520", "", "2025-05-20T00:00"] {
            assert!(matches!(
                ValidationContext::new(bad, "1h", 0.0, 1.0, MARKET_TZ),
                Err(ContextError::DeliveryDate(_))
            ));
        }
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        let err = ValidationContext::new("2025-05-20", "30min", 0.0, 1.0, MARKET_TZ).unwrap_err();
        assert_eq!(
            err.to_string(),
            "freq must be one of '1h' or '15min', got '30min'"
        );
    }

    #[test]
    fn bounds_must_be_non_negative_and_ordered() {
        assert!(matches!(
            ValidationContext::new("2025-05-20", "1h", -1.0, 1.0, MARKET_TZ),
            Err(ContextError::Bounds { .. })
        ));
        assert!(matches!(
            ValidationContext::new("2025-05-20", "1h", 2.0, 1.0, MARKET_TZ),
            Err(ContextError::Bounds { .. })
        ));
        // mini == maxi is allowed.
        assert!(ValidationContext::new("2025-05-20", "1h", 1.0, 1.0, MARKET_TZ).is_ok());
    }

    #[test]
    fn frequency_parses_and_displays() {
        assert_eq!("1h".parse::<Frequency>().unwrap(), Frequency::Hourly);
        assert_eq!("15min".parse::<Frequency>().unwrap(), Frequency::QuarterHourly);
        assert_eq!(Frequency::Hourly.to_string(), "1h");
        assert_eq!(Frequency::QuarterHourly.to_string(), "15min");
        assert_eq!(Frequency::QuarterHourly.step(), Duration::minutes(15));
    }
}
