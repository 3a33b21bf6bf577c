//! Daily crop nitrogen demand per farm.
//!
//! # CSV format
//!
//! One row per date, one column per farm, values in kg N per hectare:
//!
//! ```csv
//! date,F0001,F0002
//! 2025-01-01,0.8,1.1
//! 2025-01-02,0.8,1.0
//! ```
//!
//! Demand drives the synthetic-fertilizer offset credit and the leaching
//! penalty.  Missing dates and farms absent from the header read as zero
//! demand (deliveries there still earn the soil-carbon credit but risk
//! leaching).  Columns naming unknown farms are an error — a typo here
//! would silently zero a farm's demand for the whole year.

use std::io::Read;
use std::path::Path;

use bl_core::{FarmId, Horizon};

use crate::{DataError, DataResult, Registry};

/// Dense per-day per-farm nitrogen demand, day-major, kg N per hectare.
pub struct DemandTable {
    num_days: usize,
    num_farms: usize,
    kg_n_per_ha: Vec<f64>,
}

impl DemandTable {
    /// An all-zero table: no crop demand anywhere.
    pub fn zeros(num_days: usize, num_farms: usize) -> Self {
        Self {
            num_days,
            num_farms,
            kg_n_per_ha: vec![0.0; num_days * num_farms],
        }
    }

    /// Load `daily_n_demand.csv` for the registry's farms.
    pub fn load_csv(path: &Path, horizon: Horizon, registry: &Registry) -> DataResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, horizon, registry)
    }

    /// Like [`load_csv`][Self::load_csv] but accepts any `Read` source.
    pub fn from_reader<R: Read>(
        reader: R,
        horizon: Horizon,
        registry: &Registry,
    ) -> DataResult<Self> {
        let mut table = Self::zeros(horizon.num_days() as usize, registry.farm_count());
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DataError::parse("daily_n_demand.csv", e.to_string()))?
            .clone();
        let columns: Vec<FarmId> = headers
            .iter()
            .skip(1)
            .map(|name| {
                registry.farm_id_by_name(name.trim()).ok_or_else(|| {
                    DataError::parse("daily_n_demand.csv", format!("unknown farm column {name:?}"))
                })
            })
            .collect::<DataResult<_>>()?;

        for result in csv_reader.records() {
            let record = result.map_err(|e| DataError::parse("daily_n_demand.csv", e.to_string()))?;
            let date = record
                .get(0)
                .ok_or_else(|| DataError::parse("daily_n_demand.csv", "empty row"))?;
            let day = horizon
                .parse_date(date)
                .map_err(|e| DataError::parse("daily_n_demand.csv", e.to_string()))?;

            for (field, farm) in record.iter().skip(1).zip(&columns) {
                let kg: f64 = field.trim().parse().map_err(|_| {
                    DataError::parse(
                        "daily_n_demand.csv",
                        format!("bad demand value {field:?} on {date}"),
                    )
                })?;
                table.set(day.index(), *farm, kg);
            }
        }

        Ok(table)
    }

    pub fn set(&mut self, day: usize, farm: FarmId, kg_n_per_ha: f64) {
        self.kg_n_per_ha[day * self.num_farms + farm.index()] = kg_n_per_ha;
    }

    /// Demand on `day` at `farm`, kg N per hectare; 0 outside the table.
    #[inline]
    pub fn kg_n_per_ha(&self, day: usize, farm: FarmId) -> f64 {
        if day >= self.num_days || farm.index() >= self.num_farms {
            return 0.0;
        }
        self.kg_n_per_ha[day * self.num_farms + farm.index()]
    }

    #[inline]
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    #[inline]
    pub fn num_farms(&self) -> usize {
        self.num_farms
    }
}
