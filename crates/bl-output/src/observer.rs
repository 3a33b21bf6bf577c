//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use bl_core::Horizon;
use bl_data::Registry;
use bl_sim::{DayRecord, SimObserver};

use crate::row::{DailyScoreRow, ShipmentRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes solution and daily-score rows to any
/// [`OutputWriter`] backend (CSV, SQLite).
///
/// Shipment rows within a day are emitted sorted by plant then farm ID, so
/// the finished solution relation is ordered by day, plant, farm regardless
/// of the engine's dispatch order.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer: W,
    horizon: Horizon,
    stp_names: Vec<String>,
    stp_capacities: Vec<f64>,
    farm_names: Vec<String>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using the registry for external
    /// names and the horizon for date formatting.
    pub fn new(writer: W, registry: &Registry, horizon: Horizon) -> Self {
        Self {
            writer,
            horizon,
            stp_names: registry.stps.iter().map(|s| s.name.clone()).collect(),
            stp_capacities: registry.stps.iter().map(|s| s.storage_max_tons).collect(),
            farm_names: registry.farms.iter().map(|f| f.name.clone()).collect(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_day_end(&mut self, record: &DayRecord) {
        let date = self.horizon.date_string(record.day);

        // ── Solution rows, ordered by (plant, farm) within the day ────────
        let mut shipments: Vec<_> = record.shipments.iter().collect();
        shipments.sort_by(|a, b| a.stp.cmp(&b.stp).then(a.farm.cmp(&b.farm)));

        let rows: Vec<ShipmentRow> = shipments
            .into_iter()
            .map(|s| ShipmentRow {
                day: record.day.0,
                date: date.clone(),
                stp_id: self.stp_names[s.stp.index()].clone(),
                farm_id: self.farm_names[s.farm.index()].clone(),
                tons: s.tons,
                trucks: s.trucks,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_shipments(&rows);
            self.store_err(result);
        }

        // ── Daily-score row ───────────────────────────────────────────────
        let occupancy = record
            .stp_inventory_tons
            .iter()
            .zip(&self.stp_capacities)
            .map(|(inv, cap)| if *cap > 0.0 { inv / cap } else { 0.0 })
            .collect();

        let row = DailyScoreRow {
            day: record.day.0,
            date,
            credits_cum: record.credits_cum,
            rain_locked_farms: record.rain_locked_farms,
            occupancy,
        };
        let result = self.writer.write_daily_score(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _days_completed: usize) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
