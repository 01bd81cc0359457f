//! Mapping between teaching-day labels and calendar dates.
//!
//! The teaching week runs Monday to Saturday. Grid keys are
//! [`chrono::Weekday`] values, never formatted weekday names, so the mapping
//! does not depend on any locale.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use educonnect_core::{ClientError, ClientResult};

use super::week::Week;

/// The six teaching days, in column order.
pub const TEACHING_DAYS: [Weekday; 6] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Offset of a teaching day from the week's Monday; `None` for Sunday.
pub fn teaching_offset(day: Weekday) -> Option<u64> {
    match day {
        Weekday::Sun => None,
        other => Some(u64::from(other.num_days_from_monday())),
    }
}

/// Concrete date of `day` within `week`.
///
/// # Errors
///
/// `InvalidDayLabel` for Sunday, which is not part of the teaching calendar.
pub fn date_for_day(week: &Week, day: Weekday) -> ClientResult<NaiveDate> {
    let offset =
        teaching_offset(day).ok_or_else(|| ClientError::InvalidDayLabel(day_name(day).to_string()))?;
    week.start()
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| ClientError::InvalidDayLabel(day_name(day).to_string()))
}

/// Weekday of a civil date. Sundays are returned as such; callers decide
/// whether to draw them.
pub fn day_label_for_date(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// Parse a user-supplied day label ("Monday", "tue", ...) into a teaching day.
pub fn parse_day_label(label: &str) -> ClientResult<Weekday> {
    let day: Weekday = label
        .trim()
        .parse()
        .map_err(|_| ClientError::InvalidDayLabel(label.trim().to_string()))?;

    match teaching_offset(day) {
        Some(_) => Ok(day),
        None => Err(ClientError::InvalidDayLabel(label.trim().to_string())),
    }
}

/// Full English name, used for column headers.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
