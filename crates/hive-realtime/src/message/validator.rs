//! Message validation rules.

use chrono::{DateTime, NaiveDateTime, Utc};

use hive_core::error::AppError;

/// Reject frames that are blank or larger than `max_size` bytes.
pub fn validate_inbound(raw: &str, max_size: usize) -> Result<(), AppError> {
    if raw.len() > max_size {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_size} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Parse a client timestamp: RFC 3339, or `yyyy-MM-ddTHH:mm:ss[.fff]`
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::validation(format!("Invalid timestamp: '{raw}'")))
}
