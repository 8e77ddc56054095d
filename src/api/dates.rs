//! Calendar date parsing shared by request bodies and query strings.
//!
//! Dates travel as `YYYY-MM-DD`. Bodies may also carry a full RFC 3339
//! timestamp, in which case only its date part is kept.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years outside this range are rejected before they reach chrono arithmetic or storage.
pub const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))?;
    if !YEARS.contains(&date.year()) {
        return Err(format!("date '{}' is out of range", raw));
    }
    Ok(date)
}

/// `deserialize_with` for a required date field.
pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// `deserialize_with` for an optional date field; pair with `#[serde(default)]`.
pub fn option_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Date flavour of [`crate::api::serde_ext::nullable`].
pub fn nullable_date<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    option_date(deserializer).map(Some)
}
