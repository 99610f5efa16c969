//! Fast-path recognition and generation for simple rule shapes.
//!
//! Most real-world rules are plain: one yearly date, one day of the month,
//! a weekday spread, a daily repeat. Those expand through closed-form date
//! stepping here instead of the full filter cascade. A fast path is an
//! optimization, never a semantic divergence: generators drive the same
//! `Bounds` controller and the same `Period` stepping as the general
//! engine, and `tests/fastpath_equivalence.rs` cross-checks both paths
//! over generated rules. Anything not recognized falls back to the
//! general engine.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};

use crate::rfc::ical::core::{Frequency, Instant, Weekday};

use super::calendar;
use super::engine::{Admit, Bounds};
use super::normalize::RecurrenceRule;
use super::occurrences::OccurrenceSet;
use super::period::Period;

/// The rule shapes with specialized generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FastPathKind {
    /// YEARLY on one fixed month and day.
    SimpleYearly,
    /// MONTHLY on one fixed day of the month.
    SimpleMonthly,
    /// WEEKLY on the anchor's own weekday.
    SimpleWeeklySingle,
    /// WEEKLY over a plain weekday spread.
    SimpleWeeklySpread,
    /// DAILY with no day-level BY rule parts.
    SimpleDaily,
}

/// ## Summary
/// Decides whether a normalized rule has a fast-path shape.
///
/// Recognition runs on the normalized rule, where anchor-derived defaults
/// are already filled; a rule that spells out the same values explicitly
/// is indistinguishable from one that left them implicit, and the fast
/// path is valid for both. Returns `None` for anything the generators do
/// not cover exactly.
#[must_use]
pub fn recognize(rule: &RecurrenceRule) -> Option<FastPathKind> {
    if !rule.by_set_pos.is_empty()
        || !rule.by_week_no.is_empty()
        || !rule.by_year_day.is_empty()
        || !anchor_time_only(rule)
    {
        return None;
    }

    match rule.freq {
        Frequency::Yearly => {
            let single_positive_day =
                matches!(rule.by_month_day.as_slice(), [day] if *day > 0);
            (rule.by_month.len() == 1 && single_positive_day && rule.by_day.is_empty())
                .then_some(FastPathKind::SimpleYearly)
        }
        Frequency::Monthly => {
            let single_positive_day =
                matches!(rule.by_month_day.as_slice(), [day] if *day > 0);
            (rule.by_month.is_empty() && single_positive_day && rule.by_day.is_empty())
                .then_some(FastPathKind::SimpleMonthly)
        }
        Frequency::Weekly => {
            if !rule.by_month.is_empty()
                || rule.by_day.is_empty()
                || rule.by_day.iter().any(|entry| entry.ordinal.is_some())
            {
                return None;
            }
            let anchor_weekday = Weekday::from_chrono(rule.anchor.weekday());
            if matches!(rule.by_day.as_slice(), [entry] if entry.weekday == anchor_weekday) {
                Some(FastPathKind::SimpleWeeklySingle)
            } else {
                Some(FastPathKind::SimpleWeeklySpread)
            }
        }
        Frequency::Daily => (rule.by_month.is_empty()
            && rule.by_month_day.is_empty()
            && rule.by_day.is_empty())
        .then_some(FastPathKind::SimpleDaily),
        Frequency::Secondly | Frequency::Minutely | Frequency::Hourly => None,
    }
}

/// Whether the rule's time lists are exactly the anchor's own components.
///
/// That is the shape normalization produces for a rule with no explicit
/// BYHOUR/BYMINUTE/BYSECOND, and it means each period carries at most one
/// candidate time.
fn anchor_time_only(rule: &RecurrenceRule) -> bool {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "chrono time components are always within u8 range"
    )]
    let (hour, minute, second) = (
        rule.anchor.hour() as u8,
        rule.anchor.minute() as u8,
        rule.anchor.second() as u8,
    );
    rule.by_hour.as_slice() == [hour]
        && rule.by_minute.as_slice() == [minute]
        && rule.by_second.as_slice() == [second]
}

/// Runs the generator for a recognized rule shape.
pub(crate) fn generate(
    kind: FastPathKind,
    rule: &RecurrenceRule,
    anchor: &Instant,
    bounds: Bounds,
) -> OccurrenceSet {
    tracing::trace!(kind = ?kind, "expanding recurrence rule through fast path");
    let time = rule.anchor.time();
    match kind {
        FastPathKind::SimpleYearly => {
            let month = u32::from(rule.by_month[0]);
            let day = u32::from(rule.by_month_day[0].unsigned_abs());
            drive(rule, anchor, bounds, move |period| {
                NaiveDate::from_ymd_opt(period.start.year(), month, day)
                    .map(|date| date.and_time(time))
                    .into_iter()
                    .collect()
            })
        }
        FastPathKind::SimpleMonthly => {
            let day = u32::from(rule.by_month_day[0].unsigned_abs());
            drive(rule, anchor, bounds, move |period| {
                let (year, month) = (period.start.year(), period.start.month());
                (day <= calendar::days_in_month(year, month))
                    .then(|| NaiveDate::from_ymd_opt(year, month, day))
                    .flatten()
                    .map(|date| date.and_time(time))
                    .into_iter()
                    .collect()
            })
        }
        FastPathKind::SimpleWeeklySingle => {
            let offset = u64::from(
                Weekday::from_chrono(rule.anchor.weekday()).days_from(rule.week_start),
            );
            drive(rule, anchor, bounds, move |period| {
                period
                    .start
                    .date()
                    .checked_add_days(Days::new(offset))
                    .map(|date| date.and_time(time))
                    .into_iter()
                    .collect()
            })
        }
        FastPathKind::SimpleWeeklySpread => {
            let mut offsets: Vec<u64> = rule
                .by_day
                .iter()
                .map(|entry| u64::from(entry.weekday.days_from(rule.week_start)))
                .collect();
            offsets.sort_unstable();
            drive(rule, anchor, bounds, move |period| {
                let start = period.start.date();
                offsets
                    .iter()
                    .filter_map(|&offset| start.checked_add_days(Days::new(offset)))
                    .map(|date| date.and_time(time))
                    .collect()
            })
        }
        FastPathKind::SimpleDaily => drive(rule, anchor, bounds, move |period| {
            vec![period.start.date().and_time(time)]
        }),
    }
}

/// The shared generator loop: identical period stepping and bounds
/// accounting to the general engine, with the filter cascade replaced by
/// a closed-form candidate function.
fn drive<F>(
    rule: &RecurrenceRule,
    anchor: &Instant,
    mut bounds: Bounds,
    candidates_for: F,
) -> OccurrenceSet
where
    F: Fn(&Period) -> Vec<NaiveDateTime>,
{
    let mut set = OccurrenceSet::new();
    let Some(mut period) = Period::align(rule) else {
        return set;
    };
    loop {
        if !bounds.note_step() || bounds.past_limit(period.start) {
            break;
        }
        for candidate in candidates_for(&period) {
            match bounds.admit(candidate) {
                Admit::BeforeAnchor => {}
                Admit::PastLimit => return set,
                Admit::Emit => {
                    let Some(occurrence) = anchor.with_naive(candidate) else {
                        continue;
                    };
                    if set.insert(candidate, occurrence) && !bounds.consume() {
                        return set;
                    }
                }
            }
        }
        match period.advance(rule.interval) {
            Some(next) => period = next,
            None => break,
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{Date, DateTime, RRule, Weekday, WeekdayNum};

    fn normalized(raw: &RRule, anchor: &Instant) -> RecurrenceRule {
        RecurrenceRule::normalize(raw, anchor).expect("valid rule")
    }

    #[test]
    fn plain_rules_are_recognized() {
        let anchor = Instant::DateTime(DateTime::utc(2019, 1, 1, 9, 0, 0));
        let cases = [
            (RRule::yearly(), FastPathKind::SimpleYearly),
            (RRule::monthly(), FastPathKind::SimpleMonthly),
            (RRule::weekly(), FastPathKind::SimpleWeeklySingle),
            (RRule::daily(), FastPathKind::SimpleDaily),
        ];
        for (raw, expected) in cases {
            assert_eq!(recognize(&normalized(&raw, &anchor)), Some(expected));
        }
    }

    #[test]
    fn weekday_spread_is_recognized() {
        let anchor = Instant::Date(Date::new(2019, 1, 1));
        let raw = RRule::weekly().with_by_day(vec![
            WeekdayNum::every(Weekday::Thursday),
            WeekdayNum::every(Weekday::Friday),
        ]);
        assert_eq!(
            recognize(&normalized(&raw, &anchor)),
            Some(FastPathKind::SimpleWeeklySpread)
        );
    }

    #[test]
    fn decorated_rules_fall_back_to_general_engine() {
        let anchor = Instant::Date(Date::new(2019, 1, 1));

        // BYSETPOS always disqualifies.
        let raw = RRule::monthly()
            .with_by_day(vec![WeekdayNum::every(Weekday::Friday)])
            .with_by_set_pos(vec![1]);
        assert_eq!(recognize(&normalized(&raw, &anchor)), None);

        // Negative month days need the cascade's month-length logic.
        let raw = RRule::monthly().with_by_month_day(vec![-1]);
        assert_eq!(recognize(&normalized(&raw, &anchor)), None);

        // Ordinal weekdays are not a plain spread.
        let raw = RRule::monthly().with_by_day(vec![WeekdayNum::nth(1, Weekday::Friday)]);
        assert_eq!(recognize(&normalized(&raw, &anchor)), None);

        // Explicit times multiply candidates per period.
        let raw = RRule::daily().with_by_hour(vec![9, 17]);
        assert_eq!(recognize(&normalized(&raw, &anchor)), None);

        // Sub-daily frequencies always run through the general engine.
        let raw = RRule::hourly();
        assert_eq!(recognize(&normalized(&raw, &anchor)), None);
    }

    #[test]
    fn yearly_generator_skips_missing_leap_days() {
        let anchor = Instant::Date(Date::new(2020, 2, 29));
        let rule = normalized(&RRule::yearly().with_count(3), &anchor);
        assert_eq!(recognize(&rule), Some(FastPathKind::SimpleYearly));

        let set = generate(
            FastPathKind::SimpleYearly,
            &rule,
            &anchor,
            Bounds::new(&rule, None),
        );
        let rendered: Vec<_> = set.occurrences().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["20200229", "20240229", "20280229"]);
    }

    #[test]
    fn weekly_spread_generator_emits_in_date_order() {
        let anchor = Instant::Date(Date::new(2019, 1, 1));
        let raw = RRule::weekly()
            .with_interval(2)
            .with_count(4)
            .with_by_day(vec![
                WeekdayNum::every(Weekday::Friday),
                WeekdayNum::every(Weekday::Thursday),
            ]);
        let rule = normalized(&raw, &anchor);

        let set = generate(
            FastPathKind::SimpleWeeklySpread,
            &rule,
            &anchor,
            Bounds::new(&rule, None),
        );
        let rendered: Vec<_> = set.occurrences().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["20190103", "20190104", "20190117", "20190118"]
        );
    }
}
