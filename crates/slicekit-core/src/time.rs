//! ISO-8601 timestamps with an explicit UTC offset.
//!
//! Envelope timestamps are stored as strings so slice state stays plain and
//! serializable; the string is validated once at construction.

use crate::errors::SliceError;
use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RFC 3339 timestamp string such as `2024-05-01T12:00:00.000+02:00`.
///
/// The offset is always written explicitly (`+00:00`, never `Z`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoTimestamp(String);

impl IsoTimestamp {
    /// Format a datetime with millisecond precision and explicit offset.
    pub fn from_datetime<Tz>(datetime: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(datetime.to_rfc3339_opts(SecondsFormat::Millis, false))
    }

    /// Parse and validate an RFC 3339 string.
    pub fn parse(value: &str) -> Result<Self, SliceError> {
        DateTime::parse_from_rfc3339(value)
            .map_err(|err| SliceError::invalid_timestamp(value, err.to_string()))?;
        Ok(Self(value.to_string()))
    }

    /// The timestamp as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IsoTimestamp {
    type Error = SliceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DateTime::parse_from_rfc3339(&value)
            .map_err(|err| SliceError::invalid_timestamp(&value, err.to_string()))?;
        Ok(Self(value))
    }
}

impl From<IsoTimestamp> for String {
    fn from(value: IsoTimestamp) -> Self {
        value.0
    }
}

impl fmt::Display for IsoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
