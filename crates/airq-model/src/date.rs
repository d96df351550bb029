//! Calendar-day parsing and formatting.
//!
//! Source exports disagree on date layout: ISO dates, slash dates, compact
//! `YYYYMMDD`, hourly `YYYYMMDDHH` stamps, and full timestamps all occur.
//! Everything is reduced to a [`NaiveDate`] and written back as `YYYY-MM-DD`.

use chrono::{Days, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Parses a calendar day from a raw cell value.
///
/// Returns `None` for empty or unrecognised input.
///
/// # Examples
///
/// ```
/// use airq_model::parse_day;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2020, 3, 5).unwrap();
/// assert_eq!(parse_day("2020-03-05"), Some(day));
/// assert_eq!(parse_day("20200305"), Some(day));
/// assert_eq!(parse_day("2020-03-05 00:00:00"), Some(day));
/// assert_eq!(parse_day("not a date"), None);
/// ```
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in &DATE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(day);
        }
    }

    for fmt in &DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(stamp.date());
        }
    }

    // Hourly measurement stamps (YYYYMMDDHH) carry the day in the first 8 digits.
    if trimmed.len() == 10 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(&trimmed[..8], "%Y%m%d").ok();
    }

    None
}

/// Formats a day as `YYYY-MM-DD`.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Every calendar day from `start` to `end`, inclusive.
///
/// Empty when `end` precedes `start`.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let mut next = Some(start);
    std::iter::from_fn(move || {
        let current = next.filter(|day| *day <= end)?;
        next = current.checked_add_days(Days::new(1));
        Some(current)
    })
}
