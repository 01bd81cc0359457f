//! Serde helpers for the API's wire formats.
//!
//! The API is not consistent about calendar dates: most fields are
//! `YYYY-MM-DD`, some come back as full ISO date-times, and one query family
//! uses `MM/DD/YYYY`. Everything funnels through [`parse_wire_date`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse any date encoding the API is known to emit.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, US_DATE_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.date_naive())
                .ok()
        })
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn format_us_date(date: NaiveDate) -> String {
    date.format(US_DATE_FORMAT).to_string()
}

/// Deserialize a calendar date in any of the API's encodings.
pub fn deserialize_wire_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_wire_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date `{}`", raw)))
}

/// Treat empty strings as absent.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
