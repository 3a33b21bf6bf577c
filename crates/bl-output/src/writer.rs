//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DailyScoreRow, OutputResult, ShipmentRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Callers deliver one day's rows at a time, in day order; backends may
/// assume `write_shipments` rows arrive pre-sorted by day, plant, farm.
/// From the observer's perspective all methods are infallible — errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of solution rows (one simulated day's shipments).
    fn write_shipments(&mut self, rows: &[ShipmentRow]) -> OutputResult<()>;

    /// Write one daily-score row.
    fn write_daily_score(&mut self, row: &DailyScoreRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
