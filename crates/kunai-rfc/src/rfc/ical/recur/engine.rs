//! The general recurrence engine.
//!
//! Expansion runs as an explicit phase machine:
//!
//! ```text
//! Stepping -> Expanding -> Filtering -> Emitting -> {Stepping | Terminated}
//! ```
//!
//! Stepping checks the period against the bounds (iteration ceiling,
//! UNTIL/window limit) before any work is spent on it; Expanding builds
//! the period's day universe; Filtering runs the BY rule cascade and time
//! expansion; Emitting admits each candidate through the bounds and
//! advances the cursor once the period is exhausted.

use chrono::{NaiveDate, NaiveDateTime};

use kunai_core::constants::MAX_PERIOD_STEPS;

use crate::rfc::ical::core::Instant;

use super::filter::FilterCascade;
use super::normalize::RecurrenceRule;
use super::occurrences::OccurrenceSet;
use super::period::Period;

/// COUNT, UNTIL, window, and ceiling accounting.
///
/// Both the general engine and every fast-path generator drive the same
/// controller, so truncation behavior is identical on either path.
#[derive(Debug, Clone)]
pub(crate) struct Bounds {
    anchor: NaiveDateTime,
    limit: Option<NaiveDateTime>,
    remaining: Option<u32>,
    steps: u32,
}

/// Verdict on a single candidate instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admit {
    /// In range: emit and account against COUNT.
    Emit,
    /// Precedes the anchor: skip without consuming COUNT.
    BeforeAnchor,
    /// Exceeds UNTIL or the window end: expansion is done.
    PastLimit,
}

impl Bounds {
    /// Builds the controller from a normalized rule and the resolved
    /// window end (already defaulted to the horizon where applicable).
    pub fn new(rule: &RecurrenceRule, window_to: Option<NaiveDateTime>) -> Self {
        let limit = match (rule.until, window_to) {
            (Some(until), Some(to)) => Some(until.min(to)),
            (Some(until), None) => Some(until),
            (None, Some(to)) => Some(to),
            (None, None) => None,
        };
        Self {
            anchor: rule.anchor,
            limit,
            remaining: rule.count,
            steps: 0,
        }
    }

    /// Records one period step. Returns `false` once the ceiling is hit.
    pub fn note_step(&mut self) -> bool {
        self.steps += 1;
        self.steps <= MAX_PERIOD_STEPS
    }

    /// Whether an instant lies beyond UNTIL or the window end.
    pub fn past_limit(&self, instant: NaiveDateTime) -> bool {
        self.limit.is_some_and(|limit| instant > limit)
    }

    /// Classifies one candidate against anchor and limit.
    pub fn admit(&self, candidate: NaiveDateTime) -> Admit {
        if candidate < self.anchor {
            Admit::BeforeAnchor
        } else if self.past_limit(candidate) {
            Admit::PastLimit
        } else {
            Admit::Emit
        }
    }

    /// Consumes one unit of COUNT. Returns `false` once the budget is
    /// spent; rules without COUNT never exhaust.
    pub fn consume(&mut self) -> bool {
        match self.remaining.as_mut() {
            Some(remaining) => {
                *remaining -= 1;
                *remaining > 0
            }
            None => true,
        }
    }
}

/// Expansion phases. Each period flows through all four before the cursor
/// advances; termination can happen in Stepping or Emitting.
enum Phase {
    Stepping { period: Period },
    Expanding { period: Period },
    Filtering { period: Period, days: Vec<NaiveDate> },
    Emitting { period: Period, candidates: Vec<NaiveDateTime> },
    Terminated,
}

/// The general engine: period stepping plus the full filter cascade.
pub(crate) struct Engine<'a> {
    rule: &'a RecurrenceRule,
    anchor: &'a Instant,
    cascade: FilterCascade<'a>,
    bounds: Bounds,
}

impl<'a> Engine<'a> {
    pub fn new(rule: &'a RecurrenceRule, anchor: &'a Instant, bounds: Bounds) -> Self {
        Self {
            rule,
            anchor,
            cascade: FilterCascade::new(rule),
            bounds,
        }
    }

    /// Runs the expansion to termination and returns the accumulated set.
    pub fn run(mut self) -> OccurrenceSet {
        tracing::trace!(
            freq = %self.rule.freq,
            interval = self.rule.interval,
            "expanding recurrence rule through general engine"
        );

        let mut set = OccurrenceSet::new();
        let mut phase = match Period::align(self.rule) {
            Some(period) => Phase::Stepping { period },
            None => Phase::Terminated,
        };

        loop {
            phase = match phase {
                Phase::Stepping { period } => self.stepping(period),
                Phase::Expanding { period } => {
                    let days = self.cascade.day_universe(&period);
                    Phase::Filtering { period, days }
                }
                Phase::Filtering { period, days } => {
                    let days = self.cascade.filter_days(days);
                    let times = self.cascade.expand_times(&period, &days);
                    let candidates = self.cascade.apply_set_pos(times);
                    Phase::Emitting { period, candidates }
                }
                Phase::Emitting { period, candidates } => {
                    self.emitting(period, candidates, &mut set)
                }
                Phase::Terminated => break,
            };
        }

        tracing::trace!(occurrences = set.len(), "expansion terminated");
        set
    }

    /// Bounds-checks the period before expanding it.
    fn stepping(&mut self, period: Period) -> Phase {
        if !self.bounds.note_step() {
            tracing::trace!(
                ceiling = MAX_PERIOD_STEPS,
                "iteration ceiling reached, halting expansion"
            );
            return Phase::Terminated;
        }
        if self.bounds.past_limit(period.start) {
            return Phase::Terminated;
        }
        Phase::Expanding { period }
    }

    /// Admits each candidate, then advances the cursor.
    fn emitting(
        &mut self,
        period: Period,
        candidates: Vec<NaiveDateTime>,
        set: &mut OccurrenceSet,
    ) -> Phase {
        for candidate in candidates {
            match self.bounds.admit(candidate) {
                Admit::BeforeAnchor => {}
                Admit::PastLimit => return Phase::Terminated,
                Admit::Emit => {
                    let Some(occurrence) = self.anchor.with_naive(candidate) else {
                        continue;
                    };
                    if set.insert(candidate, occurrence) && !self.bounds.consume() {
                        return Phase::Terminated;
                    }
                }
            }
        }
        match period.advance(self.rule.interval) {
            Some(next) => Phase::Stepping { period: next },
            None => Phase::Terminated,
        }
    }
}
