//! `bl-data` — scenario inputs for the biologistics engine.
//!
//! Everything the simulation consumes from the outside world is loaded and
//! validated here, before any simulation state exists:
//!
//! | Module       | Source file                    | Contents                          |
//! |--------------|--------------------------------|-----------------------------------|
//! | [`config`]   | `config.json`                  | scenario constants + horizon year |
//! | [`registry`] | `stp_registry.csv`, `farm_locations.csv` | facilities + distance matrix |
//! | [`weather`]  | `daily_weather_<year>.csv`     | per-day per-zone rainfall (mm)    |
//! | [`demand`]   | `daily_n_demand.csv`           | per-day per-farm N demand (kg/ha) |
//!
//! All loaders accept any `Read` source so tests can pass a
//! `std::io::Cursor`; `*_csv` / `*_json` convenience wrappers open files.
//! Malformed input is rejected with [`DataError`] — the simulation never
//! starts from a partially loaded scenario.

pub mod config;
pub mod demand;
pub mod error;
pub mod registry;
pub mod weather;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AgronomicConstants, EnvironmentalThresholds, LogisticsConstants, ScenarioConfig};
pub use demand::DemandTable;
pub use error::{DataError, DataResult};
pub use registry::{Farm, Registry, Stp};
pub use weather::WeatherTable;
