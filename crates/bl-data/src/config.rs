//! Scenario configuration (`config.json`).
//!
//! # JSON format
//!
//! ```json
//! {
//!   "horizon_year": 2025,
//!   "logistics_constants": {
//!     "truck_capacity_tons": 10.0,
//!     "diesel_emission_factor_kg_co2_per_km": 0.9
//!   },
//!   "agronomic_constants": {
//!     "nitrogen_content_kg_per_ton_biosolid": 25.0,
//!     "synthetic_n_offset_credit_kg_co2_per_kg_n": 5.0,
//!     "soil_organic_carbon_gain_kg_co2_per_kg_biosolid": 0.2,
//!     "leaching_penalty_kg_co2_per_kg_excess_n": 10.0,
//!     "application_buffer_percent": 10.0
//!   },
//!   "environmental_thresholds": {
//!     "rain_lock_threshold_mm": 30.0,
//!     "stp_overflow_penalty_kg_co2_per_ton": 1000.0,
//!     "forecast_window_days": 5
//!   }
//! }
//! ```
//!
//! All credit/penalty magnitudes are stored positive; the sign convention
//! (credits added, emissions and penalties subtracted) lives in the scoring
//! code, not the data.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{DataError, DataResult};

/// Truck fleet constants.
#[derive(Clone, Debug, Deserialize)]
pub struct LogisticsConstants {
    /// Maximum load of one truck, in tons of biosolid.
    pub truck_capacity_tons: f64,
    /// Emission debit per truck-kilometre travelled.
    pub diesel_emission_factor_kg_co2_per_km: f64,
}

/// Credit and penalty factors for land application.
#[derive(Clone, Debug, Deserialize)]
pub struct AgronomicConstants {
    /// Kilograms of plant-available nitrogen per ton of biosolid.
    pub nitrogen_content_kg_per_ton_biosolid: f64,
    /// Credit per kg of N that displaces synthetic fertilizer.
    pub synthetic_n_offset_credit_kg_co2_per_kg_n: f64,
    /// Credit per kg of biosolid mass applied (soil organic carbon gain).
    pub soil_organic_carbon_gain_kg_co2_per_kg_biosolid: f64,
    /// Penalty per kg of N applied beyond the buffered daily demand.
    pub leaching_penalty_kg_co2_per_kg_excess_n: f64,
    /// Demand over-application allowance, in percent (10.0 = +10 %).
    pub application_buffer_percent: f64,
}

/// Weather and storage thresholds.
#[derive(Clone, Debug, Deserialize)]
pub struct EnvironmentalThresholds {
    /// Cumulative forecast rainfall (mm) above which a zone is rain-locked.
    pub rain_lock_threshold_mm: f64,
    /// Penalty per ton of biosolid discarded when a plant's storage overflows.
    pub stp_overflow_penalty_kg_co2_per_ton: f64,
    /// Days of forecast (today inclusive) summed for the rain-lock check.
    /// 1 = today's rainfall only.
    pub forecast_window_days: u16,
}

/// Top-level scenario configuration.
///
/// Loaded once per run; a [`ScenarioConfig`] that fails [`validate`]
/// (`ScenarioConfig::validate`) never reaches the simulation.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioConfig {
    /// Calendar year of the planning horizon.
    pub horizon_year: i32,
    #[serde(rename = "logistics_constants")]
    pub logistics: LogisticsConstants,
    #[serde(rename = "agronomic_constants")]
    pub agronomic: AgronomicConstants,
    #[serde(rename = "environmental_thresholds")]
    pub thresholds: EnvironmentalThresholds,
}

impl ScenarioConfig {
    /// Load and validate `config.json` from `path`.
    pub fn load_json(path: &Path) -> DataResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`load_json`][Self::load_json] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> DataResult<Self> {
        let config: ScenarioConfig = serde_json::from_reader(reader)
            .map_err(|e| DataError::parse("config.json", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every constant is in its sane range.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] naming the offending field.
    pub fn validate(&self) -> DataResult<()> {
        fn require(ok: bool, what: &str) -> DataResult<()> {
            if ok {
                Ok(())
            } else {
                Err(DataError::Config(what.to_string()))
            }
        }

        require(
            self.logistics.truck_capacity_tons > 0.0,
            "truck_capacity_tons must be positive",
        )?;
        require(
            self.logistics.diesel_emission_factor_kg_co2_per_km >= 0.0,
            "diesel_emission_factor_kg_co2_per_km must be non-negative",
        )?;
        require(
            self.agronomic.nitrogen_content_kg_per_ton_biosolid >= 0.0,
            "nitrogen_content_kg_per_ton_biosolid must be non-negative",
        )?;
        require(
            self.agronomic.application_buffer_percent >= 0.0,
            "application_buffer_percent must be non-negative",
        )?;
        require(
            self.thresholds.rain_lock_threshold_mm >= 0.0,
            "rain_lock_threshold_mm must be non-negative",
        )?;
        require(
            self.thresholds.forecast_window_days >= 1,
            "forecast_window_days must be at least 1",
        )?;
        Ok(())
    }

    /// The fractional over-application buffer (10 % → 0.10).
    #[inline]
    pub fn buffer_fraction(&self) -> f64 {
        self.agronomic.application_buffer_percent / 100.0
    }
}

impl Default for ScenarioConfig {
    /// Baseline constants of the Kerala 2025 scenario.  Demos and tests start
    /// from these and override what they need.
    fn default() -> Self {
        Self {
            horizon_year: 2025,
            logistics: LogisticsConstants {
                truck_capacity_tons: 10.0,
                diesel_emission_factor_kg_co2_per_km: 0.9,
            },
            agronomic: AgronomicConstants {
                nitrogen_content_kg_per_ton_biosolid: 25.0,
                synthetic_n_offset_credit_kg_co2_per_kg_n: 5.0,
                soil_organic_carbon_gain_kg_co2_per_kg_biosolid: 0.2,
                leaching_penalty_kg_co2_per_kg_excess_n: 10.0,
                application_buffer_percent: 10.0,
            },
            thresholds: EnvironmentalThresholds {
                rain_lock_threshold_mm: 30.0,
                stp_overflow_penalty_kg_co2_per_ton: 1000.0,
                forecast_window_days: 5,
            },
        }
    }
}
