//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse a stored RFC3339 timestamp
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    chrono::DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
