//! Rule normalization (RFC 5545 §3.3.10).
//!
//! Validates a raw `RRule` against its anchor and produces the canonical
//! `RecurrenceRule` the engine expands. All structural RFC constraints are
//! checked here, once; downstream code never re-validates. The implicit
//! anchor-derived defaults of §3.3.10 Note 1 are also filled here, so a
//! `FREQ=DAILY` rule anchored at 09:30:00 arrives at the engine with
//! `BYHOUR=9;BYMINUTE=30;BYSECOND=0` already present.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::rfc::ical::core::{Frequency, Instant, RRule, Weekday, WeekdayNum};

/// Error raised when a raw rule fails validation against its anchor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The rule has no FREQ part.
    #[error("RRULE is missing FREQ")]
    MissingFrequency,

    /// INTERVAL is zero.
    #[error("INTERVAL must be at least 1")]
    InvalidInterval,

    /// COUNT is zero.
    #[error("COUNT must be at least 1")]
    InvalidCount,

    /// Both COUNT and UNTIL are present.
    #[error("COUNT and UNTIL are mutually exclusive")]
    ConflictingTerminators,

    /// BYSETPOS without any other BY rule part.
    #[error("BYSETPOS requires another BY rule part")]
    OrphanBySetPos,

    /// BYWEEKNO with a frequency other than YEARLY.
    #[error("BYWEEKNO is only valid with FREQ=YEARLY")]
    ByWeekNoRequiresYearly,

    /// BYYEARDAY with DAILY, WEEKLY, or MONTHLY frequency.
    #[error("BYYEARDAY is not valid with FREQ={0}")]
    ByYearDayInvalidFreq(Frequency),

    /// BYMONTHDAY with WEEKLY frequency.
    #[error("BYMONTHDAY is not valid with FREQ=WEEKLY")]
    ByMonthDayInvalidFreq,

    /// Numeric BYDAY with a frequency other than MONTHLY or YEARLY.
    #[error("numeric BYDAY is only valid with FREQ=MONTHLY or FREQ=YEARLY")]
    OrdinalByDayInvalidFreq,

    /// Numeric BYDAY combined with BYWEEKNO.
    #[error("numeric BYDAY cannot be combined with BYWEEKNO")]
    OrdinalByDayWithByWeekNo,

    /// A BY list value outside its legal range.
    #[error("{part} value {value} is out of range")]
    OutOfRange { part: &'static str, value: i32 },

    /// UNTIL carries a different value kind than the anchor.
    #[error("UNTIL must have the same value type as the anchor")]
    UntilKindMismatch,

    /// UNTIL does not name a real calendar instant.
    #[error("UNTIL is not a valid calendar instant")]
    InvalidUntil,

    /// A window bound does not name a real calendar instant.
    #[error("window bound is not a valid calendar instant")]
    InvalidWindow,

    /// The anchor does not name a real calendar instant.
    #[error("anchor is not a valid calendar instant")]
    InvalidAnchor,
}

/// A validated, canonical recurrence rule.
///
/// Constructed once per expansion request and immutable afterwards. BY
/// lists are sorted and deduplicated; anchor-derived defaults are filled;
/// `until` is resolved to the anchor's wall-clock frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<NaiveDateTime>,
    pub week_start: Weekday,
    pub by_month: Vec<u8>,
    pub by_week_no: Vec<i8>,
    pub by_year_day: Vec<i16>,
    pub by_month_day: Vec<i8>,
    pub by_day: Vec<WeekdayNum>,
    pub by_hour: Vec<u8>,
    pub by_minute: Vec<u8>,
    pub by_second: Vec<u8>,
    pub by_set_pos: Vec<i16>,
    /// The anchor in canonical wall-clock form.
    pub anchor: NaiveDateTime,
}

impl RecurrenceRule {
    /// ## Summary
    /// Validates a raw rule against its anchor and produces the canonical
    /// form the engine expands.
    ///
    /// ## Errors
    ///
    /// Returns a [`ValidationError`] naming the first violated constraint:
    /// missing FREQ, zero INTERVAL or COUNT, conflicting terminators,
    /// orphan BYSETPOS, misplaced BYWEEKNO/BYYEARDAY/BYMONTHDAY/numeric
    /// BYDAY, an out-of-range BY value, or an UNTIL whose value kind does
    /// not match the anchor.
    pub fn normalize(raw: &RRule, anchor: &Instant) -> Result<Self, ValidationError> {
        let anchor_naive = anchor.to_naive().ok_or(ValidationError::InvalidAnchor)?;
        let freq = raw.freq.ok_or(ValidationError::MissingFrequency)?;

        let interval = raw.interval.unwrap_or(1);
        if interval == 0 {
            return Err(ValidationError::InvalidInterval);
        }

        if raw.count.is_some() && raw.until.is_some() {
            return Err(ValidationError::ConflictingTerminators);
        }
        if raw.count == Some(0) {
            return Err(ValidationError::InvalidCount);
        }

        let until = raw
            .until
            .as_ref()
            .map(|until| resolve_until(until, anchor))
            .transpose()?;

        check_ranges(raw)?;
        check_structure(raw, freq)?;

        let mut rule = Self {
            freq,
            interval,
            count: raw.count,
            until,
            week_start: raw.wkst.unwrap_or(Weekday::Monday),
            by_month: raw.by_month.clone(),
            by_week_no: raw.by_week_no.clone(),
            by_year_day: raw.by_year_day.clone(),
            by_month_day: raw.by_month_day.clone(),
            by_day: raw.by_day.clone(),
            by_hour: raw.by_hour.clone(),
            by_minute: raw.by_minute.clone(),
            by_second: raw.by_second.clone(),
            by_set_pos: raw.by_set_pos.clone(),
            anchor: anchor_naive,
        };
        rule.fill_defaults();
        rule.canonicalize();
        Ok(rule)
    }

    /// Fills the implicit anchor-derived BY defaults (§3.3.10 Note 1).
    ///
    /// Each unit finer than the frequency takes its value from the anchor
    /// unless the rule names it explicitly.
    fn fill_defaults(&mut self) {
        let anchor = self.anchor;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "chrono date-time components are always within u8 range"
        )]
        let (month, day, hour, minute, second) = (
            anchor.month() as u8,
            anchor.day() as u8,
            anchor.hour() as u8,
            anchor.minute() as u8,
            anchor.second() as u8,
        );

        if self.freq.is_at_least(Frequency::Minutely) && self.by_second.is_empty() {
            self.by_second.push(second);
        }
        if self.freq.is_at_least(Frequency::Hourly) && self.by_minute.is_empty() {
            self.by_minute.push(minute);
        }
        if self.freq.is_at_least(Frequency::Daily) && self.by_hour.is_empty() {
            self.by_hour.push(hour);
        }

        match self.freq {
            Frequency::Weekly => {
                if self.by_day.is_empty() {
                    self.by_day
                        .push(WeekdayNum::every(Weekday::from_chrono(anchor.weekday())));
                }
            }
            Frequency::Monthly => {
                if self.by_month_day.is_empty() && self.by_day.is_empty() {
                    #[expect(
                        clippy::cast_possible_wrap,
                        reason = "days of month are 1-31 and fit i8"
                    )]
                    self.by_month_day.push(day as i8);
                }
            }
            Frequency::Yearly => {
                let day_selecting = !self.by_week_no.is_empty()
                    || !self.by_year_day.is_empty()
                    || !self.by_month_day.is_empty()
                    || !self.by_day.is_empty();
                if !day_selecting {
                    if self.by_month.is_empty() {
                        self.by_month.push(month);
                    }
                    #[expect(
                        clippy::cast_possible_wrap,
                        reason = "days of month are 1-31 and fit i8"
                    )]
                    self.by_month_day.push(day as i8);
                }
            }
            Frequency::Secondly
            | Frequency::Minutely
            | Frequency::Hourly
            | Frequency::Daily => {}
        }
    }

    /// Sorts and deduplicates every BY list.
    fn canonicalize(&mut self) {
        self.by_month.sort_unstable();
        self.by_month.dedup();
        self.by_week_no.sort_unstable();
        self.by_week_no.dedup();
        self.by_year_day.sort_unstable();
        self.by_year_day.dedup();
        self.by_month_day.sort_unstable();
        self.by_month_day.dedup();
        self.by_day.sort_unstable();
        self.by_day.dedup();
        self.by_hour.sort_unstable();
        self.by_hour.dedup();
        self.by_minute.sort_unstable();
        self.by_minute.dedup();
        self.by_second.sort_unstable();
        self.by_second.dedup();
        self.by_set_pos.sort_unstable();
        self.by_set_pos.dedup();
    }
}

/// Resolves UNTIL to the anchor's wall-clock frame, checking value kinds.
fn resolve_until(until: &Instant, anchor: &Instant) -> Result<NaiveDateTime, ValidationError> {
    if until.is_date() != anchor.is_date() {
        return Err(ValidationError::UntilKindMismatch);
    }
    until.to_naive().ok_or(ValidationError::InvalidUntil)
}

/// Checks every BY list value against its legal range.
fn check_ranges(raw: &RRule) -> Result<(), ValidationError> {
    check_unsigned("BYSECOND", &raw.by_second, 60)?;
    check_unsigned("BYMINUTE", &raw.by_minute, 59)?;
    check_unsigned("BYHOUR", &raw.by_hour, 23)?;
    check_signed("BYMONTHDAY", raw.by_month_day.iter().map(|&v| i32::from(v)), 31)?;
    check_signed("BYYEARDAY", raw.by_year_day.iter().map(|&v| i32::from(v)), 366)?;
    check_signed("BYWEEKNO", raw.by_week_no.iter().map(|&v| i32::from(v)), 53)?;
    check_signed("BYSETPOS", raw.by_set_pos.iter().map(|&v| i32::from(v)), 366)?;

    for month in &raw.by_month {
        if !(1..=12).contains(month) {
            return Err(ValidationError::OutOfRange {
                part: "BYMONTH",
                value: i32::from(*month),
            });
        }
    }
    for entry in &raw.by_day {
        if let Some(ordinal) = entry.ordinal
            && (ordinal == 0 || !(-53..=53).contains(&ordinal))
        {
            return Err(ValidationError::OutOfRange {
                part: "BYDAY",
                value: i32::from(ordinal),
            });
        }
    }
    Ok(())
}

fn check_unsigned(part: &'static str, values: &[u8], max: u8) -> Result<(), ValidationError> {
    for &value in values {
        if value > max {
            return Err(ValidationError::OutOfRange {
                part,
                value: i32::from(value),
            });
        }
    }
    Ok(())
}

fn check_signed(
    part: &'static str,
    values: impl Iterator<Item = i32>,
    max: i32,
) -> Result<(), ValidationError> {
    for value in values {
        if value == 0 || value.abs() > max {
            return Err(ValidationError::OutOfRange { part, value });
        }
    }
    Ok(())
}

/// Checks the structural constraints between FREQ and the BY rule parts.
fn check_structure(raw: &RRule, freq: Frequency) -> Result<(), ValidationError> {
    if !raw.by_week_no.is_empty() && freq != Frequency::Yearly {
        return Err(ValidationError::ByWeekNoRequiresYearly);
    }
    if !raw.by_year_day.is_empty()
        && matches!(freq, Frequency::Daily | Frequency::Weekly | Frequency::Monthly)
    {
        return Err(ValidationError::ByYearDayInvalidFreq(freq));
    }
    if !raw.by_month_day.is_empty() && freq == Frequency::Weekly {
        return Err(ValidationError::ByMonthDayInvalidFreq);
    }

    let has_ordinal_day = raw.by_day.iter().any(|entry| entry.ordinal.is_some());
    if has_ordinal_day {
        if !matches!(freq, Frequency::Monthly | Frequency::Yearly) {
            return Err(ValidationError::OrdinalByDayInvalidFreq);
        }
        if !raw.by_week_no.is_empty() {
            return Err(ValidationError::OrdinalByDayWithByWeekNo);
        }
    }

    if !raw.by_set_pos.is_empty() {
        let has_companion = !raw.by_second.is_empty()
            || !raw.by_minute.is_empty()
            || !raw.by_hour.is_empty()
            || !raw.by_day.is_empty()
            || !raw.by_month_day.is_empty()
            || !raw.by_year_day.is_empty()
            || !raw.by_week_no.is_empty()
            || !raw.by_month.is_empty();
        if !has_companion {
            return Err(ValidationError::OrphanBySetPos);
        }
    }
    Ok(())
}
