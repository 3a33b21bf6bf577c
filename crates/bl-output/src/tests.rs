//! Tests for the output backends and the observer bridge.

use std::path::Path;

use bl_core::GeoPoint;
use bl_data::{DemandTable, Farm, Registry, ScenarioConfig, Stp, WeatherTable};
use bl_engine::NetCarbonModel;
use bl_sim::{Sim, SimBuilder};

use crate::{CsvWriter, DailyScoreRow, OutputWriter, ShipmentRow, SimOutputObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DAYS_2025: usize = 365;

fn test_registry() -> Registry {
    let stps = vec![
        Stp {
            name: "STP_EKM".to_string(),
            position: GeoPoint::new(9.931, 76.267),
            daily_output_tons: 30.0,
            storage_max_tons: 100.0,
        },
        Stp {
            name: "STP_TVM".to_string(),
            position: GeoPoint::new(8.524, 76.936),
            daily_output_tons: 20.0,
            storage_max_tons: 80.0,
        },
    ];
    let farms = vec![
        Farm {
            name: "F0001".to_string(),
            position: GeoPoint::new(9.95, 76.30),
            zone: 0,
            area_ha: 10.0,
            daily_intake_tons: 25.0,
        },
        Farm {
            name: "F0002".to_string(),
            position: GeoPoint::new(8.60, 76.90),
            zone: 0,
            area_ha: 12.0,
            daily_intake_tons: 30.0,
        },
    ];
    Registry::from_parts(stps, farms, vec!["z".to_string()]).unwrap()
}

fn test_sim() -> Sim<NetCarbonModel> {
    let mut config = ScenarioConfig::default();
    config.agronomic.leaching_penalty_kg_co2_per_kg_excess_n = 0.0;
    config.thresholds.forecast_window_days = 1;
    let registry = test_registry();
    let weather = WeatherTable::zeros(DAYS_2025, 1);
    let demand = DemandTable::zeros(DAYS_2025, 2);
    SimBuilder::new(config, registry, weather, demand, NetCarbonModel)
        .build()
        .unwrap()
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[test]
fn csv_writer_headers() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer =
        CsvWriter::new(dir.path(), &["STP_EKM".to_string(), "STP_TVM".to_string()]).unwrap();
    writer.finish().unwrap();

    let solution = read_lines(&dir.path().join("solution.csv"));
    assert_eq!(solution[0], "day,date,stp_id,farm_id,tons,trucks");

    let scores = read_lines(&dir.path().join("daily_scores.csv"));
    assert_eq!(
        scores[0],
        "day,date,credits_cum,rain_locked_farms,occupancy_STP_EKM,occupancy_STP_TVM"
    );
}

#[test]
fn csv_writer_formats_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::new(dir.path(), &["S".to_string()]).unwrap();

    writer
        .write_shipments(&[ShipmentRow {
            day: 4,
            date: "2025-01-05".to_string(),
            stp_id: "S".to_string(),
            farm_id: "F".to_string(),
            tons: 12.5,
            trucks: 2,
        }])
        .unwrap();
    writer
        .write_daily_score(&DailyScoreRow {
            day: 4,
            date: "2025-01-05".to_string(),
            credits_cum: 1234.5678,
            rain_locked_farms: 3,
            occupancy: vec![0.25],
        })
        .unwrap();
    writer.finish().unwrap();

    let solution = read_lines(&dir.path().join("solution.csv"));
    assert_eq!(solution[1], "4,2025-01-05,S,F,12.500,2");
    let scores = read_lines(&dir.path().join("daily_scores.csv"));
    assert_eq!(scores[1], "4,2025-01-05,1234.568,3,0.2500");
}

#[test]
fn finish_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::new(dir.path(), &[]).unwrap();
    writer.finish().unwrap();
    writer.finish().unwrap();
}

// ── Observer bridge over a real run ───────────────────────────────────────────

#[test]
fn full_run_produces_ordered_gapless_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = test_sim();
    let writer = CsvWriter::new(
        dir.path(),
        &sim.registry.stps.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
    )
    .unwrap();
    let mut observer = SimOutputObserver::new(writer, &sim.registry, sim.horizon);

    sim.run(&mut observer).unwrap();
    assert!(observer.take_error().is_none());

    // Daily scores: one row per day, ascending, no gaps.
    let scores = read_lines(&dir.path().join("daily_scores.csv"));
    assert_eq!(scores.len(), 1 + DAYS_2025);
    for (i, line) in scores[1..].iter().enumerate() {
        let day: usize = line.split(',').next().unwrap().parse().unwrap();
        assert_eq!(day, i);
    }
    assert!(scores[1].contains("2025-01-01"));
    assert!(scores[DAYS_2025].contains("2025-12-31"));

    // Solution rows: ordered by day, then plant name, then farm name.
    let solution = read_lines(&dir.path().join("solution.csv"));
    assert!(solution.len() > 1);
    let mut keys = Vec::new();
    for line in &solution[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        let day: u16 = fields[0].parse().unwrap();
        keys.push((day, fields[2].to_string(), fields[3].to_string()));
    }
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn occupancy_reflects_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sim = test_sim();
    let names: Vec<String> = sim.registry.stps.iter().map(|s| s.name.clone()).collect();
    let writer = CsvWriter::new(dir.path(), &names).unwrap();
    let mut observer = SimOutputObserver::new(writer, &sim.registry, sim.horizon);

    sim.run_days(1, &mut observer).unwrap();
    observer.into_writer().finish().unwrap();

    let record = sim.ledger.last().unwrap();
    let scores = read_lines(&dir.path().join("daily_scores.csv"));
    let fields: Vec<&str> = scores[1].split(',').collect();
    let occ_ekm: f64 = fields[4].parse().unwrap();
    assert!((occ_ekm - record.stp_inventory_tons[0] / 100.0).abs() < 1e-3);
}

// ── SQLite backend ────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::SqliteWriter;

    #[test]
    fn tables_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = SqliteWriter::new(dir.path()).unwrap();
        writer
            .write_shipments(&[ShipmentRow {
                day: 0,
                date: "2025-01-01".to_string(),
                stp_id: "S".to_string(),
                farm_id: "F".to_string(),
                tons: 15.0,
                trucks: 2,
            }])
            .unwrap();
        writer
            .write_daily_score(&DailyScoreRow {
                day: 0,
                date: "2025-01-01".to_string(),
                credits_cum: 3000.0,
                rain_locked_farms: 0,
                occupancy: vec![0.05, 0.10],
            })
            .unwrap();
        writer.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let shipments: i64 = conn
            .query_row("SELECT COUNT(*) FROM shipments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(shipments, 1);
        let ratio: f64 = conn
            .query_row("SELECT ratio FROM stp_occupancy WHERE day = 0 AND stp = 1", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert!((ratio - 0.10).abs() < 1e-12);
    }

    #[test]
    fn reopening_replaces_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut writer = SqliteWriter::new(dir.path()).unwrap();
            writer
                .write_daily_score(&DailyScoreRow {
                    day: 0,
                    date: "2025-01-01".to_string(),
                    credits_cum: 1.0,
                    rain_locked_farms: 0,
                    occupancy: vec![],
                })
                .unwrap();
            writer.finish().unwrap();
        }
        let mut writer = SqliteWriter::new(dir.path()).unwrap();
        writer.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_scores", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
