//! The `YYYYMMDD` date format used at every boundary of the scheduler:
//! CLI arguments, JSON output and the `date` column of the task table.

use chrono::NaiveDate;

use crate::error::ValidationError;

/// `chrono` format string matching [`parse`].
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Last year expressible in the four-digit `YYYYMMDD` year field.
pub const MAX_YEAR: i32 = 9999;

/// Parses an 8-digit `YYYYMMDD` string into a calendar date.
///
/// Only exactly eight ASCII digits naming a real calendar day are accepted;
/// signs, separators and surrounding whitespace are rejected.
pub fn parse(s: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDateFormat(s.to_string());

    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = s[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = s[6..8].parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats a date as `YYYYMMDD`.
pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter serializing a [`NaiveDate`] in the `YYYYMMDD` wire format.
///
/// ```
/// #[derive(serde::Serialize)]
/// struct Row {
///     #[serde(with = "planner_core::date::wire")]
///     date: chrono::NaiveDate,
/// }
/// ```
pub mod wire {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse(&s).map_err(de::Error::custom)
    }
}
