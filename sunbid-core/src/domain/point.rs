//! Raw and parsed volume observations.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::calendar::{parse_timestamp, TimestampError};

/// One raw forecast observation as received from the forecast API:
/// an ISO-8601 interval-start string and an energy volume in kWh.
///
/// This is the typed boundary for the external JSON shape. The key set is
/// closed: an item carrying any key other than `date` and `data` fails
/// deserialization instead of being silently accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPoint {
    pub date: String,
    pub data: f64,
}

impl RawPoint {
    pub fn new(date: impl Into<String>, data: f64) -> Self {
        Self {
            date: date.into(),
            data,
        }
    }

    /// Parse the timestamp, yielding a timezone-aware sample.
    pub fn to_sample(&self) -> Result<VolumeSample, TimestampError> {
        Ok(VolumeSample {
            timestamp: parse_timestamp(&self.date)?,
            value: self.data,
        })
    }
}

/// One validated observation: a timezone-aware interval start and its
/// volume. The timestamp always carries an explicit UTC offset — naive
/// instants never get this far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    pub timestamp: DateTime<FixedOffset>,
    pub value: f64,
}
