//! Time helpers
//!
//! Date-to-timestamp conversion happens at the API handler layer;
//! repositories and the check-in core only see `i64` Unix millis.

use chrono::{Local, NaiveDate, TimeZone};

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Date + hour/minute -> Unix millis in the station's local timezone
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn date_hm_to_millis(date: NaiveDate, hour: u32, min: u32) -> i64 {
    let naive = date
        .and_hms_opt(hour, min, 0)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    Local
        .from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00) -> Unix millis (local timezone)
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date_hm_to_millis(date, 0, 0)
}

/// End of day -> next day 00:00 Unix millis; callers use `< end` semantics
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hm_to_millis(next_day, 0, 0)
}

/// Lateness in whole minutes: floor((check_in - start) / 60000), never negative
pub fn lateness_minutes(check_in_millis: i64, start_millis: i64) -> i64 {
    let diff = check_in_millis - start_millis;
    if diff <= 0 { 0 } else { diff / 60_000 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lateness_is_floored_whole_minutes() {
        let start = 1_000_000_000;
        assert_eq!(lateness_minutes(start + 15 * 60_000, start), 15);
        // 59 seconds late still counts as on time in whole minutes
        assert_eq!(lateness_minutes(start + 59_000, start), 0);
        assert_eq!(lateness_minutes(start + 7 * 60_000 + 30_000, start), 7);
    }

    #[test]
    fn lateness_never_negative() {
        let start = 1_000_000_000;
        assert_eq!(lateness_minutes(start, start), 0);
        assert_eq!(lateness_minutes(start - 10 * 60_000, start), 0);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2026-08-07").is_ok());
        assert!(parse_date("07/08/2026").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn day_bounds_cover_24_hours() {
        let d = parse_date("2026-08-07").expect("valid date");
        let start = day_start_millis(d);
        let end = day_end_millis(d);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }
}
