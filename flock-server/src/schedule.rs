//! Meeting schedule generation
//!
//! Builds the weekly Friday meetings ahead of time so the check-in screen
//! always has a meeting to select. Only future Fridays are generated;
//! re-running the generator for an overlapping horizon is the operator's
//! lookout (meetings are cheap to cancel).

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use shared::models::MeetingCreate;

use crate::utils::time;

/// Meeting hours, local time
const START_HOUR: u32 = 19;
const END_HOUR: u32 = 21;

/// Generate every future Friday meeting within `months` from `today`
pub fn friday_meetings(today: NaiveDate, months: u32) -> Vec<MeetingCreate> {
    let horizon = today
        .checked_add_months(Months::new(months))
        .unwrap_or(today);

    let mut meetings = Vec::new();
    let mut day = next_friday_after(today);
    while day < horizon {
        meetings.push(MeetingCreate {
            title: "Weekly Friday meeting".to_string(),
            description: Some("Weekly gathering for the youth group".to_string()),
            location: Some("Main hall".to_string()),
            kind: "regular".to_string(),
            date: time::day_start_millis(day),
            start_time: time::date_hm_to_millis(day, START_HOUR, 0),
            end_time: time::date_hm_to_millis(day, END_HOUR, 0),
        });
        day = day.checked_add_days(Days::new(7)).unwrap_or(horizon);
    }
    meetings
}

/// First Friday strictly after the given day — a meeting generated for
/// "today" would already have started or be unannounceable
fn next_friday_after(today: NaiveDate) -> NaiveDate {
    let days_ahead = match today.weekday() {
        Weekday::Fri => 7,
        other => (Weekday::Fri.num_days_from_monday() + 7 - other.num_days_from_monday()) % 7,
    };
    today
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn generates_only_future_fridays() {
        // 2026-08-06 is a Thursday
        let meetings = friday_meetings(date(2026, 8, 6), 1);
        assert!(!meetings.is_empty());
        for m in &meetings {
            assert!(m.date > time::day_start_millis(date(2026, 8, 6)));
        }
        // First one lands on the very next day
        assert_eq!(meetings[0].date, time::day_start_millis(date(2026, 8, 7)));
    }

    #[test]
    fn a_friday_start_skips_itself() {
        // 2026-08-07 is a Friday; the generator must not schedule a meeting
        // for a day that is already underway
        let meetings = friday_meetings(date(2026, 8, 7), 1);
        assert_eq!(meetings[0].date, time::day_start_millis(date(2026, 8, 14)));
    }

    #[test]
    fn meetings_run_19_to_21() {
        let meetings = friday_meetings(date(2026, 8, 6), 1);
        let first = &meetings[0];
        assert_eq!(first.end_time - first.start_time, 2 * 3600 * 1000);
        assert_eq!(first.start_time - first.date, 19 * 3600 * 1000);
    }

    #[test]
    fn horizon_bounds_the_count() {
        // ~3 months of Fridays is 12-14 meetings
        let meetings = friday_meetings(date(2026, 8, 6), 3);
        assert!((12..=14).contains(&meetings.len()), "got {}", meetings.len());

        assert!(friday_meetings(date(2026, 8, 6), 0).is_empty());
    }

    #[test]
    fn meetings_are_a_week_apart() {
        let meetings = friday_meetings(date(2026, 8, 6), 1);
        for pair in meetings.windows(2) {
            assert_eq!(pair[1].date - pair[0].date, 7 * 24 * 3600 * 1000);
        }
    }
}
