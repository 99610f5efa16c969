//! iCalendar core value types (RFC 5545).
//!
//! These are the value types the recurrence engine computes over. They are
//! designed for:
//! - Type safety: an `Instant` is either a DATE or a DATE-TIME, never both
//! - Identity preservation: the form (floating/UTC/zoned) and TZID of an
//!   anchor flow through to every occurrence untouched
//! - Immutability: advancing a cursor always produces a new value

mod datetime;
mod rrule;

pub use datetime::{Date, DateTime, DateTimeForm, Instant};
pub use rrule::{Frequency, RRule, Weekday, WeekdayNum};
