//! Period alignment and stepping for recurrence expansion.
//!
//! A period is the FREQ-sized span currently being expanded: a calendar
//! year, a calendar month, a week aligned to the week start, a day, or a
//! single hour/minute/second. The cursor is the period's start instant;
//! advancing never materializes an invalid calendar date because monthly
//! and yearly cursors stay pinned to the first day.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::rfc::ical::core::{Frequency, Weekday};

use super::normalize::RecurrenceRule;

/// One FREQ-sized expansion period, identified by its start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Period {
    pub start: NaiveDateTime,
    pub freq: Frequency,
}

impl Period {
    /// The period enclosing the rule's anchor.
    #[must_use]
    pub fn align(rule: &RecurrenceRule) -> Option<Self> {
        let anchor = rule.anchor;
        let date = anchor.date();
        let start = match rule.freq {
            Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
            Frequency::Monthly => {
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?
            }
            Frequency::Weekly => {
                let back = Weekday::from_chrono(date.weekday()).days_from(rule.week_start);
                date.checked_sub_days(Days::new(u64::from(back)))?
                    .and_hms_opt(0, 0, 0)?
            }
            Frequency::Daily => date.and_hms_opt(0, 0, 0)?,
            Frequency::Hourly => date.and_hms_opt(anchor.hour(), 0, 0)?,
            Frequency::Minutely => date.and_hms_opt(anchor.hour(), anchor.minute(), 0)?,
            Frequency::Secondly => anchor,
        };
        Some(Self {
            start,
            freq: rule.freq,
        })
    }

    /// The next period, `interval` FREQ units later.
    ///
    /// Returns `None` only at the edges of chrono's supported range, which
    /// the bounding controller treats as exhaustion.
    #[must_use]
    pub fn advance(self, interval: u32) -> Option<Self> {
        let start = match self.freq {
            Frequency::Yearly => {
                let year = self.start.year().checked_add(i32::try_from(interval).ok()?)?;
                NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?
            }
            Frequency::Monthly => {
                let months = self.start.month0().checked_add(interval)?;
                let year = self
                    .start
                    .year()
                    .checked_add(i32::try_from(months / 12).ok()?)?;
                NaiveDate::from_ymd_opt(year, months % 12 + 1, 1)?.and_hms_opt(0, 0, 0)?
            }
            Frequency::Weekly => self
                .start
                .checked_add_days(Days::new(u64::from(interval) * 7))?,
            Frequency::Daily => self.start.checked_add_days(Days::new(u64::from(interval)))?,
            Frequency::Hourly => self
                .start
                .checked_add_signed(TimeDelta::hours(i64::from(interval)))?,
            Frequency::Minutely => self
                .start
                .checked_add_signed(TimeDelta::minutes(i64::from(interval)))?,
            Frequency::Secondly => self
                .start
                .checked_add_signed(TimeDelta::seconds(i64::from(interval)))?,
        };
        Some(Self { start, ..self })
    }
}
