//! Simulation observer trait for progress reporting and data collection.

use bl_core::Day;

use crate::DayRecord;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at day boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Output writers hook `on_day_end`; a
/// progress printer might hook only the first of each month.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_day_end(&mut self, record: &DayRecord) {
///         println!("{}: {} shipments, ledger {:.0} kg",
///                  record.day, record.shipments.len(), record.credits_cum);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each day, before production.
    fn on_day_start(&mut self, _day: Day) {}

    /// Called after the day's record has been assembled, just before it is
    /// appended to the ledger.
    fn on_day_end(&mut self, _record: &DayRecord) {}

    /// Called once after the final day completes.
    fn on_sim_end(&mut self, _days_completed: usize) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
