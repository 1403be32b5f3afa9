//! Delivery-day calendar and strict timestamp parsing.
//!
//! A delivery day is one local calendar date in a civil timezone. Its
//! absolute duration is 23, 24, or 25 hours depending on DST transitions,
//! so day boundaries are always computed through the zone's rules rather
//! than assumed to be 24 hours apart.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// The civil timezone of the market calendar. Every function below takes
/// the zone as a parameter; this is only the historical default.
pub const MARKET_TZ: Tz = chrono_tz::Europe::Paris;

/// Errors from calendar-date resolution.
///
/// Format and semantic failures are distinct variants: callers (and tests)
/// rely on telling "not even the right shape" apart from "shaped right but
/// no such date".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("Invalid date: '{0}'")]
    NonexistentDate(String),
}

/// Error from ISO-8601 timestamp parsing. Carries the offending raw string
/// and the underlying cause verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid ISO 8601 format: {raw}. Error: {cause}")]
pub struct TimestampError {
    pub raw: String,
    pub cause: String,
}

impl TimestampError {
    fn new(raw: &str, cause: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            cause: cause.into(),
        }
    }
}

/// Timezone-aware `[start, end)` boundaries of one calendar day.
///
/// `start` is midnight of `day` in `tz`, `end` is midnight of the next
/// calendar date. The absolute span between them is 23h on the spring DST
/// day, 25h on the autumn one, and 24h otherwise.
///
/// The input must match `YYYY-MM-DD` exactly (zero-padded, no time part).
pub fn day_boundaries(day: &str, tz: Tz) -> Result<(DateTime<Tz>, DateTime<Tz>), CalendarError> {
    if !is_calendar_date_format(day) {
        return Err(CalendarError::InvalidFormat(day.to_string()));
    }

    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| CalendarError::NonexistentDate(day.to_string()))?;
    if date.year() < 1 {
        return Err(CalendarError::NonexistentDate(day.to_string()));
    }
    let next = date
        .succ_opt()
        .ok_or_else(|| CalendarError::NonexistentDate(day.to_string()))?;

    let start = local_midnight(date, tz, day)?;
    let end = local_midnight(next, tz, day)?;
    Ok((start, end))
}

/// Number of hours in one calendar day of `tz` (23, 24, or 25).
pub fn hours_in_day(day: &str, tz: Tz) -> Result<i64, CalendarError> {
    let (start, end) = day_boundaries(day, tz)?;
    Ok((end - start).num_hours())
}

/// Strict ISO-8601 parser producing a timezone-aware instant.
///
/// Accepts an explicit UTC offset or the `Z` suffix (normalized to
/// `+00:00` before parsing), optional fractional seconds, and
/// minute-precision inputs without a seconds component. Naive timestamps
/// are rejected: every sample must carry its offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    if let Some(hours) = offset_hours(&normalized) {
        if hours >= 24 {
            return Err(TimestampError::new(
                raw,
                "offset must be a timedelta strictly between -timedelta(hours=24) and timedelta(hours=24)",
            ));
        }
    }

    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%z"))
        .map_err(|e| TimestampError::new(raw, e.to_string()))
}

/// Tomorrow's date in `tz`.
pub fn tomorrow(tz: Tz) -> NaiveDate {
    (Utc::now().with_timezone(&tz) + Duration::days(1)).date_naive()
}

/// Tomorrow as `YYYY-MM-DD`, the delivery-date format used everywhere.
pub fn tomorrow_str(tz: Tz) -> String {
    tomorrow(tz).format("%Y-%m-%d").to_string()
}

/// Tomorrow as `YYYYMMDD`, the auction/contract-id date format.
pub fn tomorrow_str_no_dash(tz: Tz) -> String {
    tomorrow(tz).format("%Y%m%d").to_string()
}

/// Exact `YYYY-MM-DD` shape: 4 digits, dash, 2 digits, dash, 2 digits.
pub(crate) fn is_calendar_date_format(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..].iter().all(u8::is_ascii_digit)
}

fn local_midnight(date: NaiveDate, tz: Tz, raw: &str) -> Result<DateTime<Tz>, CalendarError> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CalendarError::NonexistentDate(raw.to_string()))?;
    // Paris never skips midnight, but some zones do; take the earliest
    // valid instant rather than panicking on an ambiguous local time.
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| CalendarError::NonexistentDate(raw.to_string()))
}

/// Absolute hour component of a trailing UTC offset, if one is present
/// after the time separator. Used to preserve the out-of-range-offset
/// error message before chrono rejects the string with a generic cause.
fn offset_hours(s: &str) -> Option<u32> {
    let t = s.find('T')?;
    let tail = &s[t..];
    let sign = tail.rfind(['+', '-'])?;
    let off = &tail[sign + 1..];
    let digits: Vec<u8> = off.bytes().filter(|b| b.is_ascii_digit()).collect();
    if digits.len() < 2 {
        return None;
    }
    let hours = (digits[0] - b'0') as u32 * 10 + (digits[1] - b'0') as u32;
    Some(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn normal_days_span_24_hours() {
        for day in ["2025-05-20", "2024-01-01", "2024-02-29"] {
            let (start, end) = day_boundaries(day, MARKET_TZ).unwrap();
            assert_eq!((end - start).num_hours(), 24, "{day}");
            assert_eq!(start.hour(), 0);
            assert_eq!(end.hour(), 0);
        }
    }

    #[test]
    fn spring_forward_day_spans_23_hours() {
        let (start, end) = day_boundaries("2025-03-30", MARKET_TZ).unwrap();
        assert_eq!((end - start).num_hours(), 23);
        assert_eq!(hours_in_day("2025-03-30", MARKET_TZ).unwrap(), 23);
    }

    #[test]
    fn fall_back_day_spans_25_hours() {
        let (start, end) = day_boundaries("2025-10-26", MARKET_TZ).unwrap();
        assert_eq!((end - start).num_hours(), 25);
        assert_eq!(hours_in_day("2025-10-26", MARKET_TZ).unwrap(), 25);
    }

    #[test]
    fn boundaries_are_local_midnights() {
        let (start, end) = day_boundaries("2025-05-20", MARKET_TZ).unwrap();
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 20).unwrap());
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 21).unwrap());
    }

    #[test]
    fn format_errors_are_distinct_from_semantic_errors() {
        for bad in [
            "2025-5-20",      // missing leading zero
            "2025/05/20",     // wrong separator
            "2025-05-20T00:00", // time component
            "25-05-20",       // short year
            "invalid",
            "",
            "2025-05",
            "2025-05-20-01",
        ] {
            match day_boundaries(bad, MARKET_TZ) {
                Err(CalendarError::InvalidFormat(raw)) => assert_eq!(raw, bad),
                other => panic!("expected format error for '{bad}', got {other:?}"),
            }
        }
    }

    #[test]
    fn nonexistent_dates_are_semantic_errors() {
        for bad in [
            "2025-04-31", // April has 30 days
            "2025-02-29", // not a leap year
            "2025-00-01",
            "2025-01-00",
            "2025-13-01",
            "0000-01-01",
        ] {
            match day_boundaries(bad, MARKET_TZ) {
                Err(CalendarError::NonexistentDate(raw)) => assert_eq!(raw, bad),
                other => panic!("expected semantic error for '{bad}', got {other:?}"),
            }
        }
    }

    #[test]
    fn extreme_but_valid_dates_resolve() {
        assert_eq!(hours_in_day("1900-01-01", MARKET_TZ).unwrap(), 24);
        assert_eq!(hours_in_day("9999-12-30", MARKET_TZ).unwrap(), 24);
    }

    #[test]
    fn error_messages_embed_the_raw_input() {
        let err = day_boundaries("2025/05/20", MARKET_TZ).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format: '2025/05/20'. Expected YYYY-MM-DD"
        );
        let err = day_boundaries("2025-04-31", MARKET_TZ).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date: '2025-04-31'");
    }

    #[test]
    fn parses_explicit_offset() {
        let dt = parse_timestamp("2025-05-20T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn z_suffix_normalizes_to_utc() {
        let dt = parse_timestamp("2025-05-20T08:00:00Z").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt, parse_timestamp("2025-05-20T08:00:00+00:00").unwrap());
    }

    #[test]
    fn minute_precision_is_accepted() {
        let dt = parse_timestamp("2025-05-20T10:00+02:00").unwrap();
        assert_eq!(dt.second(), 0);
        assert_eq!(dt, parse_timestamp("2025-05-20T10:00:00+02:00").unwrap());
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let dt = parse_timestamp("2025-05-20T10:00:00.500+02:00").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn malformed_timestamps_embed_raw_and_cause() {
        for bad in ["", "2025-13-20T10:00:00+02:00", "2025-05-20T25:00:00+02:00", "not a date"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert_eq!(err.raw, bad);
            assert!(err.to_string().starts_with(&format!("Invalid ISO 8601 format: {bad}.")));
        }
    }

    #[test]
    fn naive_timestamps_are_rejected() {
        assert!(parse_timestamp("2025-05-20T10:00:00").is_err());
    }

    #[test]
    fn out_of_range_offset_preserves_timedelta_message() {
        let err = parse_timestamp("2025-05-20T10:00:00+24:00").unwrap_err();
        assert!(
            err.cause.contains("offset must be a timedelta strictly between"),
            "unexpected cause: {}",
            err.cause
        );
        // 23:59 is the last representable offset and must still parse.
        assert!(parse_timestamp("2025-05-20T10:00:00+23:59").is_ok());
    }

    #[test]
    fn tomorrow_helpers_agree() {
        let date = tomorrow(MARKET_TZ);
        assert_eq!(tomorrow_str(MARKET_TZ), date.format("%Y-%m-%d").to_string());
        assert_eq!(tomorrow_str_no_dash(MARKET_TZ), date.format("%Y%m%d").to_string());
    }
}
