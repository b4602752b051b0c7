//! Human-readable day and time labels for message timestamps.
//!
//! All functions take the reference "now" explicitly so labels are
//! deterministic and testable.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Days, FixedOffset, TimeZone, Utc};

/// Day label for a date relative to `now`:
///
/// - `Today` / `Yesterday`
/// - the weekday name when the date falls in the same ISO week as `now`
/// - `MMMM d, yyyy` otherwise
pub fn day_label<Tz: TimeZone>(date: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let day = date.date_naive();
    let today = now.date_naive();

    if day == today {
        return "Today".to_string();
    }
    if today.checked_sub_days(Days::new(1)) == Some(day) {
        return "Yesterday".to_string();
    }
    if day.iso_week() == today.iso_week() {
        return date.format("%A").to_string();
    }
    date.format("%B %-d, %Y").to_string()
}

/// Clock time like `3:05 PM`.
pub fn message_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%-I:%M %p").to_string()
}

/// Whether two instants fall on the same calendar day in the given offset.
pub fn is_same_day(a: &DateTime<Utc>, b: &DateTime<Utc>, offset: &FixedOffset) -> bool {
    a.with_timezone(offset).date_naive() == b.with_timezone(offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        // Thursday
        let now = utc(2024, 3, 14, 18, 0);
        assert_eq!(day_label(&utc(2024, 3, 14, 1, 0), &now), "Today");
        assert_eq!(day_label(&utc(2024, 3, 13, 23, 59), &now), "Yesterday");
    }

    #[test]
    fn test_same_week_uses_weekday_name() {
        let now = utc(2024, 3, 14, 18, 0);
        assert_eq!(day_label(&utc(2024, 3, 11, 9, 0), &now), "Monday");
    }

    #[test]
    fn test_older_dates_use_long_format() {
        let now = utc(2024, 3, 14, 18, 0);
        assert_eq!(day_label(&utc(2024, 3, 1, 9, 0), &now), "March 1, 2024");
        assert_eq!(day_label(&utc(2022, 12, 25, 9, 0), &now), "December 25, 2022");
    }

    #[test]
    fn test_message_time_is_twelve_hour() {
        assert_eq!(message_time(&utc(2024, 3, 14, 15, 5)), "3:05 PM");
        assert_eq!(message_time(&utc(2024, 3, 14, 0, 30)), "12:30 AM");
    }

    #[test]
    fn test_same_day_respects_offset() {
        let a = utc(2024, 3, 14, 23, 30);
        let b = utc(2024, 3, 15, 0, 30);
        let utc_offset = FixedOffset::east_opt(0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert!(!is_same_day(&a, &b, &utc_offset));
        assert!(is_same_day(&a, &b, &plus_two));
    }
}
