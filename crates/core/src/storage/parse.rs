//! Stored value parsing utilities
//!
//! Values written by older builds or edited by hand may be garbage; the
//! parsers here return `None` instead of failing so callers can decide.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;

/// Parse an epoch-millis string such as `"1718000000000"`
pub fn parse_epoch_millis(s: &str) -> Option<DateTime<Utc>> {
    s.trim()
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

pub fn format_epoch_millis(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

/// Parse a non-negative counter
pub fn parse_counter(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
