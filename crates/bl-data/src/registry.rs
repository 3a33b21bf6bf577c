//! Facility registry: plants, farms, zones and the precomputed route table.
//!
//! # CSV formats
//!
//! `stp_registry.csv` — one row per sewage treatment plant:
//!
//! ```csv
//! stp_id,daily_output_tons,storage_max_tons,lat,lon
//! STP_TVM,45.0,300.0,8.524,76.936
//! STP_EKM,60.0,400.0,9.931,76.267
//! ```
//!
//! `farm_locations.csv` — one row per receiving farm:
//!
//! ```csv
//! farm_id,zone,area_ha,daily_intake_tons,lat,lon
//! F0001,coastal_south,12.5,15.0,8.61,76.91
//! F0002,midland,8.0,10.0,9.02,76.70
//! ```
//!
//! Rows may appear in any order; [`StpId`]/[`FarmId`] are assigned by sorted
//! external name so the same files always produce the same ID assignment.
//! Weather zones are interned in first-appearance order of the sorted farm
//! list and matched by name against the weather table's columns.
//!
//! Route distances (haversine, km) between every plant/farm pair are computed
//! once at load time; the year loop only ever reads them.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use bl_core::{FarmId, GeoPoint, StpId};

use crate::{DataError, DataResult};

// ── Facility types ────────────────────────────────────────────────────────────

/// A sewage treatment plant: biosolid source with bounded storage.
#[derive(Clone, Debug)]
pub struct Stp {
    /// External identifier, e.g. `STP_TVM`.  Used in all output files.
    pub name: String,
    pub position: GeoPoint,
    /// Biosolid mass produced per day, tons.
    pub daily_output_tons: f64,
    /// Maximum mass the plant can hold, tons.
    pub storage_max_tons: f64,
}

/// A receiving farm.
#[derive(Clone, Debug)]
pub struct Farm {
    /// External identifier, e.g. `F0001`.  Used in all output files.
    pub name: String,
    pub position: GeoPoint,
    /// Index into [`Registry::zones`] — the weather zone this farm sits in.
    pub zone: usize,
    /// Cultivated area, hectares.  Scales the farm's daily nitrogen demand.
    pub area_ha: f64,
    /// Most biosolid the farm can take in one day, tons.
    pub daily_intake_tons: f64,
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StpRecord {
    stp_id: String,
    daily_output_tons: f64,
    storage_max_tons: f64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct FarmRecord {
    farm_id: String,
    zone: String,
    area_ha: f64,
    daily_intake_tons: f64,
    lat: f64,
    lon: f64,
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Immutable facility data for one scenario.
///
/// `stps` and `farms` are indexed by [`StpId`] / [`FarmId`]; the distance
/// table is plant-major (`stp.index() * farm_count + farm.index()`).
pub struct Registry {
    pub stps: Vec<Stp>,
    pub farms: Vec<Farm>,
    /// Interned weather-zone names, indexed by [`Farm::zone`].
    pub zones: Vec<String>,
    distances_km: Vec<f64>,
}

impl Registry {
    /// Load `stp_registry.csv` and `farm_locations.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> DataResult<Self> {
        let stps = std::fs::File::open(dir.join("stp_registry.csv"))?;
        let farms = std::fs::File::open(dir.join("farm_locations.csv"))?;
        Self::from_readers(stps, farms)
    }

    /// Like [`load_dir`][Self::load_dir] but accepts any `Read` sources.
    pub fn from_readers<R1: Read, R2: Read>(stp_csv: R1, farm_csv: R2) -> DataResult<Self> {
        let mut stps = Vec::new();
        for result in csv::Reader::from_reader(stp_csv).deserialize::<StpRecord>() {
            let row = result.map_err(|e| DataError::parse("stp_registry.csv", e.to_string()))?;
            if row.storage_max_tons <= 0.0 || row.daily_output_tons < 0.0 {
                return Err(DataError::Config(format!(
                    "plant {}: storage must be positive and output non-negative",
                    row.stp_id
                )));
            }
            stps.push(Stp {
                name: row.stp_id,
                position: GeoPoint::new(row.lat, row.lon),
                daily_output_tons: row.daily_output_tons,
                storage_max_tons: row.storage_max_tons,
            });
        }

        let mut zones: Vec<String> = Vec::new();
        let mut zone_ids: FxHashMap<String, usize> = FxHashMap::default();
        let mut farm_rows = Vec::new();
        for result in csv::Reader::from_reader(farm_csv).deserialize::<FarmRecord>() {
            let row = result.map_err(|e| DataError::parse("farm_locations.csv", e.to_string()))?;
            if row.area_ha < 0.0 || row.daily_intake_tons < 0.0 {
                return Err(DataError::Config(format!(
                    "farm {}: area and daily intake must be non-negative",
                    row.farm_id
                )));
            }
            farm_rows.push(row);
        }

        // Deterministic ID assignment regardless of row order in the files.
        stps.sort_by(|a, b| a.name.cmp(&b.name));
        farm_rows.sort_by(|a, b| a.farm_id.cmp(&b.farm_id));

        let farms: Vec<Farm> = farm_rows
            .into_iter()
            .map(|row| {
                let next = zones.len();
                let zone = *zone_ids.entry(row.zone.clone()).or_insert_with(|| {
                    zones.push(row.zone);
                    next
                });
                Farm {
                    name: row.farm_id,
                    position: GeoPoint::new(row.lat, row.lon),
                    zone,
                    area_ha: row.area_ha,
                    daily_intake_tons: row.daily_intake_tons,
                }
            })
            .collect();

        Self::from_parts(stps, farms, zones)
    }

    /// Build a registry from already-constructed facilities.
    ///
    /// Validates names are unique and every farm's zone index is in range,
    /// then precomputes the distance table.  Demos and tests construct their
    /// scenarios through this.
    pub fn from_parts(stps: Vec<Stp>, farms: Vec<Farm>, zones: Vec<String>) -> DataResult<Self> {
        for pair in stps.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(DataError::Config(format!("duplicate plant id {}", pair[0].name)));
            }
        }
        for pair in farms.windows(2) {
            if pair[0].name == pair[1].name {
                return Err(DataError::Config(format!("duplicate farm id {}", pair[0].name)));
            }
        }
        for farm in &farms {
            if farm.zone >= zones.len() {
                return Err(DataError::Config(format!(
                    "farm {}: zone index {} out of range",
                    farm.name, farm.zone
                )));
            }
        }
        if stps.len() > StpId::INVALID.index() {
            return Err(DataError::Config("too many plants".into()));
        }

        let mut distances_km = Vec::with_capacity(stps.len() * farms.len());
        for stp in &stps {
            for farm in &farms {
                distances_km.push(stp.position.distance_km(farm.position));
            }
        }

        Ok(Self { stps, farms, zones, distances_km })
    }

    #[inline]
    pub fn stp_count(&self) -> usize {
        self.stps.len()
    }

    #[inline]
    pub fn farm_count(&self) -> usize {
        self.farms.len()
    }

    #[inline]
    pub fn stp(&self, id: StpId) -> &Stp {
        &self.stps[id.index()]
    }

    #[inline]
    pub fn farm(&self, id: FarmId) -> &Farm {
        &self.farms[id.index()]
    }

    /// Route distance from plant to farm, kilometres.
    #[inline]
    pub fn distance_km(&self, stp: StpId, farm: FarmId) -> f64 {
        self.distances_km[stp.index() * self.farms.len() + farm.index()]
    }

    /// Look up a farm by external name.  O(n); used only at load time.
    pub fn farm_id_by_name(&self, name: &str) -> Option<FarmId> {
        self.farms
            .iter()
            .position(|f| f.name == name)
            .map(|i| FarmId(i as u32))
    }

    /// Look up a zone index by name.  O(n); used only at load time.
    pub fn zone_by_name(&self, name: &str) -> Option<usize> {
        self.zones.iter().position(|z| z == name)
    }
}
