//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way it is stored in `sentiment_qa.created_at`
pub fn to_storage(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored `created_at` value back into a UTC timestamp
pub fn from_storage(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_storage_format_is_utc_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(to_storage(ts), "2024-03-09T14:05:07.000Z");
    }

    #[test]
    fn test_storage_parse_accepts_offsets() {
        let parsed = from_storage("2024-03-09T09:05:07-05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap());
    }

    #[test]
    fn test_storage_parse_rejects_garbage() {
        assert!(from_storage("yesterday").is_none());
        assert!(from_storage("").is_none());
    }
}
