//! iCalendar DATE and DATE-TIME value types (RFC 5545 §3.3.4, §3.3.5).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// DATE value (RFC 5545 §3.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    /// Year (e.g., 2026).
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
}

impl Date {
    /// Creates a new date value.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Converts to a `chrono::NaiveDate`, if the date exists on the calendar.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }

    /// Builds a date from a `chrono::NaiveDate`.
    ///
    /// Returns `None` for years outside the `u16` range iCalendar can carry.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "chrono months and days are always within u8 range"
    )]
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        use chrono::Datelike;
        let year = u16::try_from(date.year()).ok()?;
        Some(Self {
            year,
            month: date.month() as u8,
            day: date.day() as u8,
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

/// Form of DATE-TIME value (RFC 5545 §3.3.5).
///
/// iCalendar DATE-TIME values come in three mutually exclusive forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeForm {
    /// Floating time - same wall-clock time in any timezone.
    ///
    /// Example: `19980118T230000`
    Floating,

    /// UTC time - absolute instant, indicated by 'Z' suffix.
    ///
    /// Example: `19980119T070000Z`
    Utc,

    /// Zoned time - local time with TZID reference.
    ///
    /// Example: `TZID=America/New_York:19980119T020000`
    Zoned {
        /// The timezone identifier, carried opaquely.
        tzid: String,
    },
}

/// DATE-TIME value (RFC 5545 §3.3.5).
///
/// A specific point in time, which may be floating, UTC, or zoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTime {
    /// Year (e.g., 2026).
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Day of month (1-31).
    pub day: u8,
    /// Hour (0-23).
    pub hour: u8,
    /// Minute (0-59).
    pub minute: u8,
    /// Second (0-60, allowing for leap seconds).
    pub second: u8,
    /// The form of this DATE-TIME (floating, UTC, or zoned).
    pub form: DateTimeForm,
}

impl DateTime {
    /// Creates a floating DATE-TIME.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "Constructor mirrors RFC 5545 DATE-TIME components"
    )]
    pub fn floating(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Floating,
        }
    }

    /// Creates a UTC DATE-TIME.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "Constructor mirrors RFC 5545 DATE-TIME components"
    )]
    pub fn utc(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Utc,
        }
    }

    /// Creates a zoned DATE-TIME.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "Constructor mirrors RFC 5545 DATE-TIME components plus TZID"
    )]
    pub fn zoned(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        tzid: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            form: DateTimeForm::Zoned { tzid: tzid.into() },
        }
    }

    /// Returns whether this is a UTC time.
    #[must_use]
    pub fn is_utc(&self) -> bool {
        matches!(self.form, DateTimeForm::Utc)
    }

    /// Returns whether this is a floating time.
    #[must_use]
    pub fn is_floating(&self) -> bool {
        matches!(self.form, DateTimeForm::Floating)
    }

    /// Returns the timezone ID if this is a zoned time.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match &self.form {
            DateTimeForm::Zoned { tzid } => Some(tzid),
            DateTimeForm::Floating | DateTimeForm::Utc => None,
        }
    }

    /// Converts to a `chrono::NaiveDateTime`, discarding the form.
    ///
    /// Returns `None` if the components do not name a real wall-clock
    /// instant (day 30 of February, second 60).
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )?;
        let time = NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )?;
        Some(NaiveDateTime::new(date, time))
    }

    /// Builds a DATE-TIME from a `chrono::NaiveDateTime` and a form.
    ///
    /// Returns `None` for years outside the `u16` range iCalendar can carry.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "chrono hours, minutes and seconds are always within u8 range"
    )]
    pub fn from_naive(naive: NaiveDateTime, form: DateTimeForm) -> Option<Self> {
        let date = Date::from_naive(naive.date())?;
        Some(Self {
            year: date.year,
            month: date.month,
            day: date.day,
            hour: naive.hour() as u8,
            minute: naive.minute() as u8,
            second: naive.second() as u8,
            form,
        })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}T{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.is_utc() {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// A single calendar instant: a DATE or a DATE-TIME, as DTSTART supplies it.
///
/// The recurrence engine takes its anchor as an `Instant` and emits
/// occurrences of the same kind, reproducing the anchor's form and TZID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instant {
    /// Date-only value (`DTSTART;VALUE=DATE`).
    Date(Date),
    /// Date-time value.
    DateTime(DateTime),
}

impl Instant {
    /// Returns whether this instant is date-only.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the timezone ID if this is a zoned date-time.
    #[must_use]
    pub fn tzid(&self) -> Option<&str> {
        match self {
            Self::Date(_) => None,
            Self::DateTime(dt) => dt.tzid(),
        }
    }

    /// The canonical wall-clock form of this instant.
    ///
    /// Date-only values map to midnight. Returns `None` if the components
    /// do not name a real calendar instant.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d.to_naive()?.and_hms_opt(0, 0, 0)?),
            Self::DateTime(dt) => dt.to_naive(),
        }
    }

    /// Builds an instant at `naive` carrying this instant's kind, form, and
    /// TZID. Used to materialize occurrences from engine cursor values.
    #[must_use]
    pub fn with_naive(&self, naive: NaiveDateTime) -> Option<Self> {
        match self {
            Self::Date(_) => Date::from_naive(naive.date()).map(Self::Date),
            Self::DateTime(dt) => {
                DateTime::from_naive(naive, dt.form.clone()).map(Self::DateTime)
            }
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}
