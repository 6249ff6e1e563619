//! Wire types for covid19api.com responses and the values handed to callers.
//!
//! # Design
//! The wire structs mirror only the fields this client reads; serde ignores
//! the rest of each upstream object. Decoding into them is the schema check,
//! so a response missing `Level.LevelDesc` or `Global` fails at the parse
//! boundary rather than deep inside an accessor.
//!
//! Counts are `i64` because the upstream publishes negative daily
//! corrections.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One element of the `premium/country/{country}` response.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CountryDay {
    pub date: String,
    pub new_cases: i64,
    pub new_deaths: i64,
}

/// Body of `premium/travel/country/{country}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelResponse {
    pub level: TravelLevel,
    pub country: TravelCountry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelLevel {
    pub level: u32,
    pub level_desc: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TravelCountry {
    pub timestamp: String,
}

/// Body of `summary`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SummaryResponse {
    pub global: GlobalSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GlobalSummary {
    pub new_confirmed: i64,
    pub total_confirmed: i64,
    pub new_deaths: i64,
    pub total_deaths: i64,
    pub date: String,
}

/// A single day's count for one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub confirmed: i64,
}

impl DailyRecord {
    /// The date as `dd/mm/YYYY`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

/// Worldwide totals from the summary endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalTotals {
    pub new_cases: i64,
    pub total_cases: i64,
    pub new_deaths: i64,
    pub total_deaths: i64,
    pub timestamp: DateTime<Utc>,
}

impl GlobalTotals {
    pub fn formatted_timestamp(&self) -> String {
        format_report_time(&self.timestamp)
    }
}

/// A country's travel advisory level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TravelRestriction {
    pub level: u32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl TravelRestriction {
    pub fn formatted_timestamp(&self) -> String {
        format_report_time(&self.timestamp)
    }
}

fn format_report_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y at %H:%M GMT").to_string()
}

/// Parse an upstream ISO-8601 timestamp.
///
/// Accepts RFC 3339 with `Z` or an offset, a naive date-time (taken as UTC),
/// or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ApiError::Schema(format!("unparseable timestamp {raw:?}")))
}

/// Calendar date of an upstream ISO-8601 timestamp, as written by the
/// source. An offset does not shift the day.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(parsed.date_naive());
    }
    parse_timestamp(raw).map(|ts| ts.date_naive())
}
