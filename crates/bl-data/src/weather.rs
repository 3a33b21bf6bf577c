//! Daily rainfall by weather zone, and the rain-lock rule.
//!
//! # CSV format
//!
//! One row per date, one column per zone:
//!
//! ```csv
//! date,coastal_south,midland,highland
//! 2025-01-01,0.0,2.5,11.0
//! 2025-01-02,0.0,0.0,34.2
//! ```
//!
//! Dates missing from the file and zones missing from the header read as
//! 0 mm — absent weather data means "no rain recorded", never an error.
//! Columns whose header matches no registry zone are ignored.
//!
//! # Rain lock
//!
//! A zone is rain-locked on day `d` when the cumulative rainfall over the
//! forecast window `[d, d + window)` exceeds the threshold.  With a window
//! of 1 this is the plain "today's rainfall > 30 mm" rule; the Kerala
//! scenario uses a 5-day window so trucks are already held back when a
//! monsoon burst is approaching.  Days past the end of the year contribute
//! 0 mm.

use std::io::Read;
use std::path::Path;

use bl_core::Horizon;

use crate::{DataError, DataResult, Registry};

/// Dense per-day per-zone rainfall table, day-major.
pub struct WeatherTable {
    num_days: usize,
    num_zones: usize,
    rainfall_mm: Vec<f64>,
}

impl WeatherTable {
    /// An all-zero table: no rain anywhere, ever.
    pub fn zeros(num_days: usize, num_zones: usize) -> Self {
        Self {
            num_days,
            num_zones,
            rainfall_mm: vec![0.0; num_days * num_zones],
        }
    }

    /// Load `daily_weather_<year>.csv` for the registry's zones.
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
        let mut table = Self::zeros(horizon.num_days() as usize, registry.zones.len());
        let mut csv_reader = csv::Reader::from_reader(reader);

        // Map each CSV column (after `date`) to a registry zone, or None for
        // columns covering zones this scenario doesn't use.
        let headers = csv_reader
            .headers()
            .map_err(|e| DataError::parse("daily_weather.csv", e.to_string()))?
            .clone();
        let columns: Vec<Option<usize>> = headers
            .iter()
            .skip(1)
            .map(|name| registry.zone_by_name(name.trim()))
            .collect();

        for result in csv_reader.records() {
            let record = result.map_err(|e| DataError::parse("daily_weather.csv", e.to_string()))?;
            let date = record
                .get(0)
                .ok_or_else(|| DataError::parse("daily_weather.csv", "empty row"))?;
            let day = horizon
                .parse_date(date)
                .map_err(|e| DataError::parse("daily_weather.csv", e.to_string()))?;

            for (field, zone) in record.iter().skip(1).zip(&columns) {
                let Some(zone) = *zone else { continue };
                let mm: f64 = field.trim().parse().map_err(|_| {
                    DataError::parse(
                        "daily_weather.csv",
                        format!("bad rainfall value {field:?} on {date}"),
                    )
                })?;
                table.set(day.index(), zone, mm);
            }
        }

        Ok(table)
    }

    pub fn set(&mut self, day: usize, zone: usize, mm: f64) {
        self.rainfall_mm[day * self.num_zones + zone] = mm;
    }

    /// Rainfall on `day` in `zone`; 0 mm outside the table.
    #[inline]
    pub fn rainfall_mm(&self, day: usize, zone: usize) -> f64 {
        if day >= self.num_days || zone >= self.num_zones {
            return 0.0;
        }
        self.rainfall_mm[day * self.num_zones + zone]
    }

    /// Cumulative rainfall over `[day, day + window)`, padding past the end
    /// of the table with 0 mm.
    pub fn forecast_sum_mm(&self, day: usize, zone: usize, window: u16) -> f64 {
        (0..window as usize)
            .map(|offset| self.rainfall_mm(day + offset, zone))
            .sum()
    }

    /// The rain-lock rule: forecast sum strictly above the threshold.
    #[inline]
    pub fn rain_locked(&self, day: usize, zone: usize, threshold_mm: f64, window: u16) -> bool {
        self.forecast_sum_mm(day, zone, window) > threshold_mm
    }

    #[inline]
    pub fn num_days(&self) -> usize {
        self.num_days
    }

    #[inline]
    pub fn num_zones(&self) -> usize {
        self.num_zones
    }
}
