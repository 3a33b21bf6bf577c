//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `shipments`, `daily_scores`, and `stp_occupancy` (the
//! per-plant occupancy column of the daily-score relation, normalized).
//! Tables are dropped and recreated on open — a new run replaces the old.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{DailyScoreRow, OutputResult, ShipmentRow};

/// Writes run output to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS shipments;
             DROP TABLE IF EXISTS daily_scores;
             DROP TABLE IF EXISTS stp_occupancy;
             CREATE TABLE shipments (
                 day     INTEGER NOT NULL,
                 date    TEXT    NOT NULL,
                 stp_id  TEXT    NOT NULL,
                 farm_id TEXT    NOT NULL,
                 tons    REAL    NOT NULL,
                 trucks  INTEGER NOT NULL
             );
             CREATE TABLE daily_scores (
                 day               INTEGER PRIMARY KEY,
                 date              TEXT NOT NULL,
                 credits_cum       REAL NOT NULL,
                 rain_locked_farms INTEGER NOT NULL
             );
             CREATE TABLE stp_occupancy (
                 day    INTEGER NOT NULL,
                 stp    INTEGER NOT NULL,
                 ratio  REAL    NOT NULL,
                 PRIMARY KEY (day, stp)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_shipments(&mut self, rows: &[ShipmentRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO shipments (day, date, stp_id, farm_id, tons, trucks) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.day,
                    row.date,
                    row.stp_id,
                    row.farm_id,
                    row.tons,
                    row.trucks,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_daily_score(&mut self, row: &DailyScoreRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO daily_scores (day, date, credits_cum, rain_locked_farms) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.day, row.date, row.credits_cum, row.rain_locked_farms],
        )?;
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO stp_occupancy (day, stp, ratio) VALUES (?1, ?2, ?3)")?;
        for (stp, ratio) in row.occupancy.iter().enumerate() {
            stmt.execute(rusqlite::params![row.day, stp as i64, ratio])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
