//! Date and time helpers
//!
//! Free-form date parsing, legacy `Y-m-d` style formatting, day ranges,
//! duration breakdowns and time zone offsets.

use crate::error::{HelperError, Result};
use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default output format of [`get_dates_between_dates`]
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d";

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y", "%d-%m-%Y"];

/// Whole-unit breakdown of a number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Parse a date or date-time written in one of the common notations
///
/// Accepts ISO dates (`1970-01-02`), US dates (`01/02/1970`), European dates
/// (`02.01.1970`, `02-01-1970`), the same with a time of day, RFC 3339,
/// RFC 2822 and `@<unix seconds>`. Offsets are converted to UTC. Dates
/// without a time resolve to midnight.
///
/// # Errors
///
/// [`HelperError::InvalidDate`] when no notation matches.
///
/// # Example
///
/// ```rust
/// use helperbox::datetime::parse_date_time;
///
/// let a = parse_date_time("12/31/1969").unwrap();
/// let b = parse_date_time("1969-12-31 00:00:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    if let Some(seconds) = input.strip_prefix('@') {
        return seconds
            .parse::<i64>()
            .ok()
            .and_then(|s| DateTime::from_timestamp(s, 0))
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| HelperError::InvalidDate(input.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| HelperError::InvalidDate(input.to_string()))
}

/// Format a date-time with single-letter format codes
///
/// Supported codes:
/// - `d` day with leading zero, `j` day without, `D` short weekday, `l` full weekday
/// - `N` ISO weekday (1 = Monday), `w` weekday (0 = Sunday), `z` day of year from 0
/// - `m` month with leading zero, `n` month without, `M` short month, `F` full month
/// - `t` days in month, `L` leap year flag, `Y` four-digit year, `y` two-digit year
/// - `H`/`G` 24-hour, `h`/`g` 12-hour, `i` minutes, `s` seconds, `a`/`A` meridiem
/// - `U` unix seconds
///
/// A backslash emits the next character literally; other characters pass through.
///
/// # Example
///
/// ```rust
/// use helperbox::datetime::{format_date, parse_date_time};
///
/// let dt = parse_date_time("2025-01-15 14:30:45").unwrap();
/// assert_eq!(format_date(&dt, "Y-m-d"), "2025-01-15");
/// assert_eq!(format_date(&dt, "m/d/Y H:i"), "01/15/2025 14:30");
/// assert_eq!(format_date(&dt, "l, F j"), "Wednesday, January 15");
/// ```
pub fn format_date(dt: &NaiveDateTime, format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let piece = match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
                continue;
            }

            // Day
            'd' => format!("{:02}", dt.day()),
            'j' => dt.day().to_string(),
            'D' => dt.format("%a").to_string(),
            'l' => dt.format("%A").to_string(),
            'N' => dt.weekday().number_from_monday().to_string(),
            'w' => dt.weekday().num_days_from_sunday().to_string(),
            'z' => dt.ordinal0().to_string(),

            // Month
            'm' => format!("{:02}", dt.month()),
            'n' => dt.month().to_string(),
            'M' => dt.format("%b").to_string(),
            'F' => dt.format("%B").to_string(),
            't' => days_in_month(dt.year(), dt.month()).to_string(),

            // Year
            'L' => u8::from(NaiveDate::from_ymd_opt(dt.year(), 2, 29).is_some()).to_string(),
            'Y' => format!("{:04}", dt.year()),
            'y' => format!("{:02}", dt.year().rem_euclid(100)),

            // Time
            'a' => if dt.hour() < 12 { "am" } else { "pm" }.to_string(),
            'A' => if dt.hour() < 12 { "AM" } else { "PM" }.to_string(),
            'g' => hour12(dt.hour()).to_string(),
            'h' => format!("{:02}", hour12(dt.hour())),
            'G' => dt.hour().to_string(),
            'H' => format!("{:02}", dt.hour()),
            'i' => format!("{:02}", dt.minute()),
            's' => format!("{:02}", dt.second()),
            'U' => dt.and_utc().timestamp().to_string(),

            _ => {
                result.push(c);
                continue;
            }
        };
        result.push_str(&piece);
    }

    result
}

fn hour12(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// List every calendar day from `start` through `end`, formatted with `format`
///
/// The day count is the whole-day distance between the two instants. The
/// walk always goes forward from `start`, so reversed input still yields
/// `start` followed by the following days.
///
/// # Errors
///
/// [`HelperError::InvalidDate`] if either bound cannot be parsed.
///
/// # Example
///
/// ```rust
/// use helperbox::datetime::get_dates_between_dates;
///
/// let dates = get_dates_between_dates("12/31/1969", "01/02/1970", "m/d/Y").unwrap();
/// assert_eq!(dates, vec!["12/31/1969", "01/01/1970", "01/02/1970"]);
/// ```
pub fn get_dates_between_dates(start: &str, end: &str, format: &str) -> Result<Vec<String>> {
    let start = parse_date_time(start)?;
    let end = parse_date_time(end)?;
    let days = (end - start).num_days().unsigned_abs();

    let mut dates = Vec::new();
    let mut current = start;
    for _ in 0..=days {
        dates.push(format_date(&current, format));
        current = match current.checked_add_signed(TimeDelta::days(1)) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(dates)
}

/// Split a number of seconds into fixed-length days, hours, minutes and seconds
///
/// # Example
///
/// ```rust
/// use helperbox::datetime::{seconds_to_time, TimeBreakdown};
///
/// assert_eq!(
///     seconds_to_time(90061),
///     TimeBreakdown { days: 1, hours: 1, minutes: 1, seconds: 1 }
/// );
/// ```
pub const fn seconds_to_time(total_seconds: u64) -> TimeBreakdown {
    TimeBreakdown {
        days: total_seconds / SECONDS_PER_DAY,
        hours: total_seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR,
        minutes: total_seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        seconds: total_seconds % SECONDS_PER_MINUTE,
    }
}

/// Current UTC offset of an IANA time zone, in seconds
///
/// # Errors
///
/// [`HelperError::UnknownTimezone`] for identifiers outside the tz database.
pub fn get_timezone_offset(time_zone: &str) -> Result<i32> {
    timezone_offset_at(time_zone, Utc::now())
}

/// UTC offset of an IANA time zone at a given instant, in seconds
///
/// # Errors
///
/// [`HelperError::UnknownTimezone`] for identifiers outside the tz database.
pub fn timezone_offset_at(time_zone: &str, instant: DateTime<Utc>) -> Result<i32> {
    let tz: Tz = time_zone
        .parse()
        .map_err(|_| HelperError::UnknownTimezone(time_zone.to_string()))?;
    Ok(instant.with_timezone(&tz).offset().fix().local_minus_utc())
}

/// Map ISO day 7 (Sunday) to 0, leaving every other value unchanged
pub const fn get_normalized_day_of_week(day: u32) -> u32 {
    if day == 7 {
        0
    } else {
        day
    }
}
