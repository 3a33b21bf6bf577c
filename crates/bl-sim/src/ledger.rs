//! The append-only output ledger.

use bl_core::Day;

use crate::DayRecord;

/// Ordered, append-only collection of [`DayRecord`]s.
///
/// Records arrive in strictly increasing day order with no gaps; once
/// appended they are only ever read.  On a fatal invariant violation the
/// ledger is left truncated at the last completed day — partial results are
/// preserved for diagnosis.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ledger {
    records: Vec<DayRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next day's record.
    ///
    /// # Panics
    /// Panics in debug mode if `record.day` is not the next expected day —
    /// the loop must never skip or replay a day.
    pub(crate) fn push(&mut self, record: DayRecord) {
        debug_assert_eq!(record.day.index(), self.records.len(), "ledger days must be gapless");
        self.records.push(record);
    }

    /// The record for `day`, if that day has completed.
    pub fn get(&self, day: Day) -> Option<&DayRecord> {
        self.records.get(day.index())
    }

    /// All completed days, in order.
    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    /// The most recent completed day's record.
    pub fn last(&self) -> Option<&DayRecord> {
        self.records.last()
    }

    /// Number of completed days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
