//! iCalendar RRULE (Recurrence Rule) value type (RFC 5545 §3.3.10, §3.8.5.3).

use std::fmt;

use super::Instant;

/// Recurrence frequency (RFC 5545 §3.3.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secondly => "SECONDLY",
            Self::Minutely => "MINUTELY",
            Self::Hourly => "HOURLY",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Parses a frequency from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SECONDLY" => Self::Secondly,
            "MINUTELY" => Self::Minutely,
            "HOURLY" => Self::Hourly,
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => return None,
        })
    }

    /// Returns whether the base period is finer than one day.
    #[must_use]
    pub const fn is_sub_daily(self) -> bool {
        matches!(self, Self::Secondly | Self::Minutely | Self::Hourly)
    }

    /// Returns whether the base period is at least `other`'s.
    ///
    /// Frequencies order from SECONDLY (finest) to YEARLY (coarsest); the
    /// anchor-derived defaults of RFC 5545 §3.3.10 fill a BY rule part
    /// exactly when the frequency is coarser than the part's unit.
    #[must_use]
    pub const fn is_at_least(self, other: Self) -> bool {
        self.rank() >= other.rank()
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Secondly => 0,
            Self::Minutely => 1,
            Self::Hourly => 2,
            Self::Daily => 3,
            Self::Weekly => 4,
            Self::Monthly => 5,
            Self::Yearly => 6,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Returns the two-letter abbreviation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "SU",
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
        }
    }

    /// Parses a weekday from a two-letter abbreviation (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_uppercase().as_str() {
            "SU" => Self::Sunday,
            "MO" => Self::Monday,
            "TU" => Self::Tuesday,
            "WE" => Self::Wednesday,
            "TH" => Self::Thursday,
            "FR" => Self::Friday,
            "SA" => Self::Saturday,
            _ => return None,
        })
    }

    /// Converts from a `chrono::Weekday`.
    #[must_use]
    pub const fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }

    /// Number of days from `start` to this weekday, in `0..7`.
    ///
    /// `Friday.days_from(Monday) == 4`; `Monday.days_from(Friday) == 3`.
    #[must_use]
    pub const fn days_from(self, start: Self) -> u32 {
        (7 + self.number() - start.number()) % 7
    }

    const fn number(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weekday with optional occurrence number.
///
/// Used in the BYDAY rule part. Examples:
/// - `MO` - every Monday
/// - `1MO` - first Monday of the month/year
/// - `-1FR` - last Friday of the month/year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekdayNum {
    /// Optional occurrence number (-53 to 53, excluding 0).
    pub ordinal: Option<i8>,
    /// The day of the week.
    pub weekday: Weekday,
}

impl WeekdayNum {
    /// Creates a weekday occurrence without an ordinal.
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    /// Creates a weekday occurrence with an ordinal.
    ///
    /// ## Panics
    ///
    /// Panics if ordinal is 0 or outside the range -53..=53.
    #[must_use]
    pub fn nth(ordinal: i8, weekday: Weekday) -> Self {
        assert!(ordinal != 0 && (-53..=53).contains(&ordinal));
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.ordinal {
            write!(f, "{n}")?;
        }
        write!(f, "{}", self.weekday)
    }
}

/// Recurrence rule (RFC 5545 §3.3.10, §3.8.5.3), as handed over by the
/// property layer: a raw field map with no validation applied.
///
/// Expansion first passes this through rule normalization, which checks
/// every structural constraint and fills the anchor-derived defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RRule {
    /// Recurrence frequency (required).
    pub freq: Option<Frequency>,

    /// Recurrence interval (default: 1).
    /// Defines how often the frequency repeats.
    pub interval: Option<u32>,

    /// End instant of the recurrence, inclusive (mutually exclusive with
    /// count). Must carry the same value kind as the anchor.
    pub until: Option<Instant>,

    /// Number of occurrences (mutually exclusive with until).
    pub count: Option<u32>,

    /// Week start day (default: Monday).
    pub wkst: Option<Weekday>,

    /// By-second list (0-60, 60 for leap second).
    pub by_second: Vec<u8>,

    /// By-minute list (0-59).
    pub by_minute: Vec<u8>,

    /// By-hour list (0-23).
    pub by_hour: Vec<u8>,

    /// By-day list with optional occurrence numbers.
    pub by_day: Vec<WeekdayNum>,

    /// By-monthday list (-31 to 31, excluding 0).
    pub by_month_day: Vec<i8>,

    /// By-yearday list (-366 to 366, excluding 0).
    pub by_year_day: Vec<i16>,

    /// By-weekno list (-53 to 53, excluding 0).
    pub by_week_no: Vec<i8>,

    /// By-month list (1-12).
    pub by_month: Vec<u8>,

    /// By-setpos list (-366 to 366, excluding 0).
    /// Selects positions within the frequency period.
    pub by_set_pos: Vec<i16>,
}

impl RRule {
    /// Creates a new empty recurrence rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a secondly recurrence rule.
    #[must_use]
    pub fn secondly() -> Self {
        Self {
            freq: Some(Frequency::Secondly),
            ..Self::default()
        }
    }

    /// Creates a minutely recurrence rule.
    #[must_use]
    pub fn minutely() -> Self {
        Self {
            freq: Some(Frequency::Minutely),
            ..Self::default()
        }
    }

    /// Creates an hourly recurrence rule.
    #[must_use]
    pub fn hourly() -> Self {
        Self {
            freq: Some(Frequency::Hourly),
            ..Self::default()
        }
    }

    /// Creates a daily recurrence rule.
    #[must_use]
    pub fn daily() -> Self {
        Self {
            freq: Some(Frequency::Daily),
            ..Self::default()
        }
    }

    /// Creates a weekly recurrence rule.
    #[must_use]
    pub fn weekly() -> Self {
        Self {
            freq: Some(Frequency::Weekly),
            ..Self::default()
        }
    }

    /// Creates a monthly recurrence rule.
    #[must_use]
    pub fn monthly() -> Self {
        Self {
            freq: Some(Frequency::Monthly),
            ..Self::default()
        }
    }

    /// Creates a yearly recurrence rule.
    #[must_use]
    pub fn yearly() -> Self {
        Self {
            freq: Some(Frequency::Yearly),
            ..Self::default()
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the count.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the until instant.
    #[must_use]
    pub fn with_until(mut self, until: Instant) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the week start day.
    #[must_use]
    pub fn with_wkst(mut self, wkst: Weekday) -> Self {
        self.wkst = Some(wkst);
        self
    }

    /// Sets the by-second list.
    #[must_use]
    pub fn with_by_second(mut self, seconds: Vec<u8>) -> Self {
        self.by_second = seconds;
        self
    }

    /// Sets the by-minute list.
    #[must_use]
    pub fn with_by_minute(mut self, minutes: Vec<u8>) -> Self {
        self.by_minute = minutes;
        self
    }

    /// Sets the by-hour list.
    #[must_use]
    pub fn with_by_hour(mut self, hours: Vec<u8>) -> Self {
        self.by_hour = hours;
        self
    }

    /// Sets the by-day list.
    #[must_use]
    pub fn with_by_day(mut self, days: Vec<WeekdayNum>) -> Self {
        self.by_day = days;
        self
    }

    /// Sets the by-monthday list.
    #[must_use]
    pub fn with_by_month_day(mut self, days: Vec<i8>) -> Self {
        self.by_month_day = days;
        self
    }

    /// Sets the by-yearday list.
    #[must_use]
    pub fn with_by_year_day(mut self, days: Vec<i16>) -> Self {
        self.by_year_day = days;
        self
    }

    /// Sets the by-weekno list.
    #[must_use]
    pub fn with_by_week_no(mut self, weeks: Vec<i8>) -> Self {
        self.by_week_no = weeks;
        self
    }

    /// Sets the by-month list.
    #[must_use]
    pub fn with_by_month(mut self, months: Vec<u8>) -> Self {
        self.by_month = months;
        self
    }

    /// Sets the by-setpos list.
    #[must_use]
    pub fn with_by_set_pos(mut self, positions: Vec<i16>) -> Self {
        self.by_set_pos = positions;
        self
    }
}

impl fmt::Display for RRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(freq) = self.freq {
            parts.push(format!("FREQ={freq}"));
        }

        if let Some(interval) = self.interval
            && interval != 1
        {
            parts.push(format!("INTERVAL={interval}"));
        }

        if let Some(ref until) = self.until {
            parts.push(format!("UNTIL={until}"));
        }

        if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }

        if let Some(wkst) = self.wkst {
            parts.push(format!("WKST={wkst}"));
        }

        for (name, list) in [
            ("BYSECOND", join(&self.by_second)),
            ("BYMINUTE", join(&self.by_minute)),
            ("BYHOUR", join(&self.by_hour)),
            ("BYDAY", join(&self.by_day)),
            ("BYMONTHDAY", join(&self.by_month_day)),
            ("BYYEARDAY", join(&self.by_year_day)),
            ("BYWEEKNO", join(&self.by_week_no)),
            ("BYMONTH", join(&self.by_month)),
            ("BYSETPOS", join(&self.by_set_pos)),
        ] {
            if let Some(list) = list {
                parts.push(format!("{name}={list}"));
            }
        }

        write!(f, "{}", parts.join(";"))
    }
}

fn join<T: ToString>(values: &[T]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let rendered: Vec<_> = values.iter().map(ToString::to_string).collect();
    Some(rendered.join(","))
}
