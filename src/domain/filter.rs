//! Transaction list filters
//!
//! Parses the optional `type`, `category`, `start_date` and `end_date` query
//! parameters into a validated filter. Date bounds are inclusive.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::DomainError;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Validated filter for listing an account's transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Type tag, matched case-insensitively
    pub kind: Option<String>,
    /// Category label, matched exactly
    pub category: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TransactionFilter {
    /// Build a filter from raw query values. Blank values are ignored.
    pub fn parse(
        kind: Option<&str>,
        category: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, DomainError> {
        let start = non_blank(start_date).map(|raw| parse_bound(raw, Bound::Start)).transpose()?;
        let end = non_blank(end_date).map(|raw| parse_bound(raw, Bound::End)).transpose()?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DomainError::InvertedDateRange);
            }
        }

        Ok(Self {
            kind: non_blank(kind).map(str::to_string),
            category: non_blank(category).map(str::to_string),
            start,
            end,
        })
    }

    /// Filter restricted to a single category.
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }
}

/// Parse a transaction timestamp. A plain date means midnight of that day.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DomainError> {
    parse_bound(raw.trim(), Bound::Start)
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts a plain date, a naive timestamp or an RFC 3339 timestamp.
/// A plain date expands to the first or last instant of that day.
fn parse_bound(raw: &str, bound: Bound) -> Result<NaiveDateTime, DomainError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let datetime = match bound {
            Bound::Start => date.and_hms_opt(0, 0, 0),
            Bound::End => date.and_hms_micro_opt(23, 59, 59, 999_999),
        };
        return datetime.ok_or_else(|| DomainError::invalid_date(raw));
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(datetime);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|datetime| datetime.naive_utc())
        .map_err(|_| DomainError::invalid_date(raw))
}
