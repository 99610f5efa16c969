//! Recurrence expansion core for iCalendar (RFC 5545).
//!
//! The crate's subject is the RRULE expansion engine: anchor instant plus
//! recurrence description in, the ordered and deduplicated occurrence set
//! out. Wire-text parsing and serialization, timezone resolution, and the
//! component object model belong to the surrounding layers; this crate
//! carries TZID identities opaquely and computes in wall-clock space.

pub mod error;
pub mod rfc;
