//! CSV output backend.
//!
//! Creates two files in the configured output directory (truncating any
//! previous run's output):
//! - `solution.csv`
//! - `daily_scores.csv`
//!
//! `daily_scores.csv` carries one `occupancy_<stp>` column per plant, so its
//! header depends on the scenario's registry.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DailyScoreRow, OutputResult, ShipmentRow};

/// Writes run output to two CSV files.
pub struct CsvWriter {
    solution: Writer<File>,
    scores: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    ///
    /// `stp_names` are the registry's plant names in `StpId` order; they
    /// become the occupancy column headers.
    pub fn new(dir: &Path, stp_names: &[String]) -> OutputResult<Self> {
        let mut solution = Writer::from_path(dir.join("solution.csv"))?;
        solution.write_record(["day", "date", "stp_id", "farm_id", "tons", "trucks"])?;

        let mut scores = Writer::from_path(dir.join("daily_scores.csv"))?;
        let mut header = vec![
            "day".to_string(),
            "date".to_string(),
            "credits_cum".to_string(),
            "rain_locked_farms".to_string(),
        ];
        header.extend(stp_names.iter().map(|name| format!("occupancy_{name}")));
        scores.write_record(&header)?;

        Ok(Self { solution, scores, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_shipments(&mut self, rows: &[ShipmentRow]) -> OutputResult<()> {
        for row in rows {
            self.solution.write_record(&[
                row.day.to_string(),
                row.date.clone(),
                row.stp_id.clone(),
                row.farm_id.clone(),
                format!("{:.3}", row.tons),
                row.trucks.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_daily_score(&mut self, row: &DailyScoreRow) -> OutputResult<()> {
        let mut record = vec![
            row.day.to_string(),
            row.date.clone(),
            format!("{:.3}", row.credits_cum),
            row.rain_locked_farms.to_string(),
        ];
        record.extend(row.occupancy.iter().map(|r| format!("{r:.4}")));
        self.scores.write_record(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.solution.flush()?;
        self.scores.flush()?;
        Ok(())
    }
}
