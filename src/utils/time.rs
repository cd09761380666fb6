//! Timestamp helpers shared by the persistence and circulation layers.
//!
//! Timestamps are stored as RFC 3339 UTC strings with second precision so that
//! string comparison in SQL matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::DomainError;

/// Format a timestamp the way it is stored in the database.
pub fn to_db_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time, already in storage format.
pub fn now_db_timestamp() -> String {
    to_db_timestamp(Utc::now())
}

/// Parse a stored timestamp back into a UTC datetime.
pub fn parse_db_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("invalid stored timestamp '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stored_format_is_second_precision_zulu() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(to_db_timestamp(dt), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn parse_accepts_offsets() {
        let dt = parse_db_timestamp("2024-03-09T09:05:01+02:00").unwrap();
        assert_eq!(to_db_timestamp(dt), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(
            parse_db_timestamp("yesterday"),
            Err(DomainError::Internal(_))
        ));
    }
}
