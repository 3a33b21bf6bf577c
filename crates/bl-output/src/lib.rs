//! `bl-output` — solution and daily-score writers.
//!
//! Two relations leave a completed run:
//!
//! - **solution** — one row per shipment, ordered by day, then plant, then
//!   farm.  The submission artifact.
//! - **daily scores** — one row per day (gapless, ascending) with the
//!   cumulative carbon ledger, per-plant storage occupancy, and the
//!   rain-locked farm count.  The sole feed for the dashboard.
//!
//! Both use overwrite semantics: a new run replaces the previous files.
//!
//! Backends implement [`OutputWriter`]; [`SimOutputObserver`] bridges the
//! simulation's observer hooks onto any backend.
//!
//! # Cargo features
//!
//! | Feature  | Effect                                   |
//! |----------|------------------------------------------|
//! | `sqlite` | Adds the [`SqliteWriter`] backend.       |

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DailyScoreRow, ShipmentRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
