//! The BY rule filter cascade (RFC 5545 §3.3.10).
//!
//! One period expands into candidate instants in three stages: the day
//! universe of the period, the ordered day-level filters (BYMONTH,
//! BYWEEKNO, BYYEARDAY, BYMONTHDAY, BYDAY), and time expansion (BYHOUR,
//! BYMINUTE, BYSECOND). BYSETPOS then selects positions out of the
//! period's sorted candidate list.
//!
//! Impossible concrete dates never materialize: the universe only holds
//! real calendar days, so `BYMONTHDAY=31` in February simply matches
//! nothing and the period yields no candidate.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::rfc::ical::core::{Frequency, Weekday};

use super::calendar;
use super::normalize::RecurrenceRule;
use super::period::Period;

/// Applies the BY rule parts of one rule to successive periods.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FilterCascade<'a> {
    rule: &'a RecurrenceRule,
}

impl<'a> FilterCascade<'a> {
    pub fn new(rule: &'a RecurrenceRule) -> Self {
        Self { rule }
    }

    /// The candidate days of a period, before any filtering.
    ///
    /// For YEARLY rules with BYWEEKNO the universe is the days of the
    /// selected weeks, which may spill into the adjacent calendar years;
    /// those days belong to this period's week-based year.
    pub fn day_universe(&self, period: &Period) -> Vec<NaiveDate> {
        let start = period.start.date();
        match period.freq {
            Frequency::Yearly if !self.rule.by_week_no.is_empty() => {
                self.week_universe(start.year())
            }
            Frequency::Yearly => {
                let len = calendar::days_in_year(start.year());
                (1..=len)
                    .filter_map(|ordinal| NaiveDate::from_yo_opt(start.year(), ordinal))
                    .collect()
            }
            Frequency::Monthly => {
                let len = calendar::days_in_month(start.year(), start.month());
                (1..=len)
                    .filter_map(|day| NaiveDate::from_ymd_opt(start.year(), start.month(), day))
                    .collect()
            }
            Frequency::Weekly => (0..7)
                .filter_map(|offset| start.checked_add_days(Days::new(offset)))
                .collect(),
            Frequency::Daily | Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                vec![start]
            }
        }
    }

    /// Days of the weeks BYWEEKNO selects in `year`.
    fn week_universe(&self, year: i32) -> Vec<NaiveDate> {
        let Some(weeks) = calendar::weeks_in_year(year, self.rule.week_start) else {
            return Vec::new();
        };
        let Some(first_start) = calendar::week_start_of_year(year, self.rule.week_start) else {
            return Vec::new();
        };

        let mut days = Vec::new();
        for &week in &self.rule.by_week_no {
            let Some(resolved) = calendar::resolve_signed_index(i32::from(week), weeks) else {
                continue;
            };
            let offset = u64::from(resolved - 1) * 7;
            for day in 0..7 {
                if let Some(date) = first_start.checked_add_days(Days::new(offset + day)) {
                    days.push(date);
                }
            }
        }
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Narrows the day universe through the ordered day-level filters.
    pub fn filter_days(&self, mut days: Vec<NaiveDate>) -> Vec<NaiveDate> {
        if !self.rule.by_month.is_empty() {
            days.retain(|day| {
                u8::try_from(day.month()).is_ok_and(|month| self.rule.by_month.contains(&month))
            });
        }
        if !self.rule.by_year_day.is_empty() {
            days.retain(|day| self.matches_year_day(*day));
        }
        if !self.rule.by_month_day.is_empty() {
            days.retain(|day| self.matches_month_day(*day));
        }
        if !self.rule.by_day.is_empty() {
            days.retain(|day| self.matches_by_day(*day));
        }
        days
    }

    fn matches_year_day(&self, date: NaiveDate) -> bool {
        let len = calendar::days_in_year(date.year());
        self.rule.by_year_day.iter().any(|&year_day| {
            calendar::resolve_signed_index(i32::from(year_day), len) == Some(date.ordinal())
        })
    }

    fn matches_month_day(&self, date: NaiveDate) -> bool {
        let len = calendar::days_in_month(date.year(), date.month());
        self.rule.by_month_day.iter().any(|&month_day| {
            calendar::resolve_signed_index(i32::from(month_day), len) == Some(date.day())
        })
    }

    /// Whether a day matches any BYDAY entry.
    ///
    /// Ordinal entries resolve against the enclosing month for MONTHLY
    /// rules (and YEARLY rules narrowed by BYMONTH), against the whole
    /// year for plain YEARLY rules. Normalization guarantees ordinals
    /// appear nowhere else.
    fn matches_by_day(&self, date: NaiveDate) -> bool {
        let weekday = Weekday::from_chrono(date.weekday());
        let month_scope = self.rule.freq == Frequency::Monthly
            || (self.rule.freq == Frequency::Yearly && !self.rule.by_month.is_empty());
        self.rule.by_day.iter().any(|entry| {
            let Some(ordinal) = entry.ordinal else {
                return entry.weekday == weekday;
            };
            if entry.weekday != weekday {
                return false;
            }
            let resolved = if month_scope {
                calendar::nth_weekday_of_month(date.year(), date.month(), entry.weekday, ordinal)
            } else {
                calendar::nth_weekday_of_year(date.year(), entry.weekday, ordinal)
            };
            resolved == Some(date)
        })
    }

    /// Crosses surviving days with the rule's time sets.
    ///
    /// For DAILY and coarser frequencies the time lists are complete
    /// (normalization filled any gap from the anchor) and expand. For
    /// sub-daily frequencies the cursor supplies the fixed components and
    /// explicit lists act as limits.
    pub fn expand_times(&self, period: &Period, days: &[NaiveDate]) -> Vec<NaiveDateTime> {
        let mut candidates = Vec::new();
        match period.freq {
            Frequency::Secondly => {
                let time = period.start.time();
                if self.admits_hour(time.hour())
                    && self.admits_minute(time.minute())
                    && self.admits_second(time.second())
                {
                    for day in days {
                        candidates.push(day.and_time(time));
                    }
                }
            }
            Frequency::Minutely => {
                let (hour, minute) = (period.start.hour(), period.start.minute());
                if self.admits_hour(hour) && self.admits_minute(minute) {
                    for day in days {
                        for &second in &self.rule.by_second {
                            if let Some(time) =
                                NaiveTime::from_hms_opt(hour, minute, u32::from(second))
                            {
                                candidates.push(day.and_time(time));
                            }
                        }
                    }
                }
            }
            Frequency::Hourly => {
                let hour = period.start.hour();
                if self.admits_hour(hour) {
                    for day in days {
                        for &minute in &self.rule.by_minute {
                            for &second in &self.rule.by_second {
                                if let Some(time) = NaiveTime::from_hms_opt(
                                    hour,
                                    u32::from(minute),
                                    u32::from(second),
                                ) {
                                    candidates.push(day.and_time(time));
                                }
                            }
                        }
                    }
                }
            }
            Frequency::Daily | Frequency::Weekly | Frequency::Monthly | Frequency::Yearly => {
                for day in days {
                    for &hour in &self.rule.by_hour {
                        for &minute in &self.rule.by_minute {
                            for &second in &self.rule.by_second {
                                if let Some(time) = NaiveTime::from_hms_opt(
                                    u32::from(hour),
                                    u32::from(minute),
                                    u32::from(second),
                                ) {
                                    candidates.push(day.and_time(time));
                                }
                            }
                        }
                    }
                }
            }
        }
        candidates
    }

    fn admits_hour(&self, hour: u32) -> bool {
        self.rule.by_hour.is_empty()
            || u8::try_from(hour).is_ok_and(|hour| self.rule.by_hour.contains(&hour))
    }

    fn admits_minute(&self, minute: u32) -> bool {
        self.rule.by_minute.is_empty()
            || u8::try_from(minute).is_ok_and(|minute| self.rule.by_minute.contains(&minute))
    }

    fn admits_second(&self, second: u32) -> bool {
        self.rule.by_second.is_empty()
            || u8::try_from(second).is_ok_and(|second| self.rule.by_second.contains(&second))
    }

    /// BYSETPOS selection over the period's sorted candidate list.
    ///
    /// Positions count 1-based from the front, negative from the back;
    /// positions outside the list are silently dropped.
    pub fn apply_set_pos(&self, candidates: Vec<NaiveDateTime>) -> Vec<NaiveDateTime> {
        if self.rule.by_set_pos.is_empty() || candidates.is_empty() {
            return candidates;
        }
        let len = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        let mut selected: Vec<_> = self
            .rule
            .by_set_pos
            .iter()
            .filter_map(|&position| {
                let resolved = calendar::resolve_signed_index(i32::from(position), len)?;
                let index = usize::try_from(resolved).ok()?;
                candidates.get(index - 1).copied()
            })
            .collect();
        selected.sort_unstable();
        selected.dedup();
        selected
    }

    /// The full cascade: universe, day filters, time expansion, BYSETPOS.
    pub fn candidates(&self, period: &Period) -> Vec<NaiveDateTime> {
        let days = self.filter_days(self.day_universe(period));
        let times = self.expand_times(period, &days);
        self.apply_set_pos(times)
    }
}
