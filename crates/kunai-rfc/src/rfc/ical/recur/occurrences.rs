//! The ordered, deduplicated result container for recurrence expansion.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::rfc::ical::core::Instant;

/// Occurrences keyed by their canonical wall-clock instant.
///
/// Keys are unique: overlapping BY rule expansions that resolve to the
/// same instant collapse to one entry. Iteration is chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceSet {
    entries: BTreeMap<NaiveDateTime, Instant>,
}

impl OccurrenceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an occurrence. Returns `true` if the instant was new.
    pub(crate) fn insert(&mut self, key: NaiveDateTime, value: Instant) -> bool {
        match self.entries.entry(key) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Drops every occurrence strictly before `from`.
    pub(crate) fn truncate_before(&mut self, from: NaiveDateTime) {
        self.entries = self.entries.split_off(&from);
    }

    /// Number of occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chronological iteration over `(instant key, occurrence)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDateTime, &Instant)> {
        self.entries.iter()
    }

    /// Chronological iteration over the canonical instant keys.
    pub fn keys(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.entries.keys()
    }

    /// Chronological iteration over the occurrence values.
    pub fn occurrences(&self) -> impl Iterator<Item = &Instant> {
        self.entries.values()
    }

    /// The earliest occurrence, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Instant> {
        self.entries.values().next()
    }

    /// The latest occurrence, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Instant> {
        self.entries.values().next_back()
    }

    /// Consumes the set, yielding occurrences in chronological order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Instant> {
        self.entries.into_values().collect()
    }
}

impl IntoIterator for OccurrenceSet {
    type Item = (NaiveDateTime, Instant);
    type IntoIter = std::collections::btree_map::IntoIter<NaiveDateTime, Instant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
