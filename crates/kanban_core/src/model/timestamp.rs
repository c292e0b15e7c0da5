//! Timestamp text formats shared by storage and display.
//!
//! Stored timestamps carry minute precision only, so values are truncated
//! before they enter an entity.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError, Timelike};

/// `dd/MM/yyyy HH:mm`
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";
/// `dd/MM/yyyy`
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub fn parse_datetime(text: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
}

pub fn format_date(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a `dd/MM/yyyy` date as the start of that day.
pub fn parse_date(text: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map(|date| date.and_time(NaiveTime::MIN))
}
