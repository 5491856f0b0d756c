//! Time helpers for business timezone conversion
//!
//! All date-string parsing happens at the service boundary; the manager
//! and aggregator only ever see `DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use shared::{ApiError, ApiResult};

/// Parse a date-time string (`YYYY-MM-DD HH:MM:SS`) in the business
/// timezone into UTC
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn parse_datetime(value: &str, tz: Tz) -> ApiResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| ApiError::validation(format!("Invalid date format: {}", value)))?;
    Ok(naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc()))
}

/// Current calendar date in the business timezone
pub fn today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Calendar date of a timestamp in the business timezone
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Calendar-month bucket key (`YYYY-MM`) in the business timezone
///
/// Lexicographic order of keys equals chronological order.
pub fn month_key(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_in_timezone() {
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        // 2026-01-15 10:00:00 CET == 09:00:00 UTC
        let parsed = parse_datetime("2026-01-15 10:00:00", tz).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("15/01/2026", chrono_tz::UTC).is_err());
        assert!(parse_datetime("2026-01-15", chrono_tz::UTC).is_err());
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        // 23:30 UTC on Jun 1 is already Jun 2 in Madrid (CEST, +2)
        let ts = Utc.with_ymd_and_hms(2026, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(local_date(ts, tz), NaiveDate::from_ymd_opt(2026, 6, 2).unwrap());
        assert_eq!(month_key(ts, tz), "2026-06");
    }

    #[test]
    fn test_month_keys_sort_chronologically() {
        let tz = chrono_tz::UTC;
        let a = month_key(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(), tz);
        let b = month_key(Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap(), tz);
        let c = month_key(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), tz);
        assert!(a < b && b < c);
    }
}
