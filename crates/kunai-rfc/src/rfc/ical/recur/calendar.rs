//! Calendar arithmetic helpers for recurrence expansion.
//!
//! Week numbering follows RFC 5545 §3.3.10: a week is seven days starting
//! on the configured week start, and week 1 of a year is the first week
//! containing at least four days of that year. With a Monday week start
//! this is exactly ISO 8601 week numbering.

use chrono::{Datelike, Days, NaiveDate};

use crate::rfc::ical::core::Weekday;

/// Returns whether `year` is a leap year in the Gregorian calendar.
#[must_use]
pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `year` (365 or 366).
#[must_use]
pub(crate) fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in the given month.
#[must_use]
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// First day of week 1 of `year` for the given week start.
///
/// Returns `None` only at the edges of chrono's supported year range.
#[must_use]
pub(crate) fn week_start_of_year(year: i32, wkst: Weekday) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    // Days from the enclosing week's start to January 1st.
    let offset = Weekday::from_chrono(jan1.weekday()).days_from(wkst);
    if offset <= 3 {
        jan1.checked_sub_days(Days::new(u64::from(offset)))
    } else {
        jan1.checked_add_days(Days::new(u64::from(7 - offset)))
    }
}

/// Number of weeks (52 or 53) in `year` for the given week start.
#[must_use]
pub(crate) fn weeks_in_year(year: i32, wkst: Weekday) -> Option<u32> {
    let this = week_start_of_year(year, wkst)?;
    let next = week_start_of_year(year + 1, wkst)?;
    let days = next.signed_duration_since(this).num_days();
    u32::try_from(days / 7).ok()
}

/// The nth (1-based, negative counts from the end) `weekday` of a month.
#[must_use]
pub(crate) fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: i8,
) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let len = days_in_month(year, month);
    if ordinal > 0 {
        let offset = weekday.days_from(Weekday::from_chrono(first.weekday()));
        let day = 1 + offset + (u32::from(ordinal.unsigned_abs()) - 1) * 7;
        (day <= len).then(|| NaiveDate::from_ymd_opt(year, month, day))?
    } else {
        let last = NaiveDate::from_ymd_opt(year, month, len)?;
        let back = Weekday::from_chrono(last.weekday()).days_from(weekday);
        let day = len.checked_sub(back + (u32::from(ordinal.unsigned_abs()) - 1) * 7)?;
        (day >= 1).then(|| NaiveDate::from_ymd_opt(year, month, day))?
    }
}

/// The nth (1-based, negative counts from the end) `weekday` of a year.
#[must_use]
pub(crate) fn nth_weekday_of_year(year: i32, weekday: Weekday, ordinal: i8) -> Option<NaiveDate> {
    let len = days_in_year(year);
    if ordinal > 0 {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let offset = weekday.days_from(Weekday::from_chrono(first.weekday()));
        let ordinal_day = 1 + offset + (u32::from(ordinal.unsigned_abs()) - 1) * 7;
        (ordinal_day <= len).then(|| NaiveDate::from_yo_opt(year, ordinal_day))?
    } else {
        let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
        let back = Weekday::from_chrono(last.weekday()).days_from(weekday);
        let ordinal_day = len.checked_sub(back + (u32::from(ordinal.unsigned_abs()) - 1) * 7)?;
        (ordinal_day >= 1).then(|| NaiveDate::from_yo_opt(year, ordinal_day))?
    }
}

/// Resolves a signed one-based index against a collection of `len` items.
///
/// `1` is the first item, `-1` the last. Returns `None` for zero and for
/// indices outside the collection.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the resolved index is within 1..=len, which fits u32"
)]
pub(crate) fn resolve_signed_index(index: i32, len: u32) -> Option<u32> {
    let len = i64::from(len);
    let index = i64::from(index);
    let resolved = if index > 0 {
        index
    } else if index < 0 {
        len + index + 1
    } else {
        return None;
    };
    (1..=len).contains(&resolved).then(|| resolved as u32)
}
