//! Synthetic Kerala scenario: three treatment plants, twelve paddy farms,
//! seeded monsoon weather and seasonal nitrogen demand.

use std::io::Cursor;

use bl_core::{FarmId, Horizon};
use bl_data::{DataResult, DemandTable, Registry, WeatherTable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// Plant names follow district codes (Ernakulam, Thiruvananthapuram,
// Kozhikode).  Combined output is 135 t/day against 144 t/day of farm
// intake, so storage stays tight through the monsoon.
const STP_CSV: &str = "\
stp_id,daily_output_tons,storage_max_tons,lat,lon
STP_EKM,60.0,400.0,9.931,76.267
STP_TVM,45.0,300.0,8.524,76.936
STP_KZD,30.0,250.0,11.258,75.780
";

const FARM_CSV: &str = "\
farm_id,zone,area_ha,daily_intake_tons,lat,lon
F0001,coastal_south,12.5,15.0,8.61,76.91
F0002,coastal_south,9.0,11.0,8.73,76.80
F0003,coastal_south,16.0,14.0,8.95,76.62
F0004,midland,8.0,10.0,9.02,76.70
F0005,midland,14.0,13.0,9.45,76.55
F0006,midland,11.0,12.0,9.80,76.40
F0007,midland,18.0,15.0,10.05,76.35
F0008,midland,10.5,11.0,10.40,76.20
F0009,highland,13.0,12.0,10.75,76.05
F0010,highland,9.5,10.0,11.05,75.95
F0011,highland,15.0,13.0,11.30,75.85
F0012,highland,12.0,12.0,11.55,75.70
";

pub fn build_registry() -> DataResult<Registry> {
    Registry::from_readers(Cursor::new(STP_CSV), Cursor::new(FARM_CSV))
}

/// Seeded synthetic rainfall: southwest monsoon June through September with
/// an October northeast tail, heavier over the highland zone.
pub fn synthetic_weather(registry: &Registry, horizon: Horizon, seed: u64) -> WeatherTable {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut table = WeatherTable::zeros(horizon.num_days() as usize, registry.zones.len());

    for day in horizon.days() {
        let (month, _) = horizon.month_day(day);
        let wet_chance = match month {
            6..=9 => 0.65,
            10 => 0.40,
            5 | 11 => 0.20,
            _ => 0.05,
        };
        for zone in 0..registry.zones.len() {
            if rng.gen_bool(wet_chance) {
                let relief = match registry.zones[zone].as_str() {
                    "highland" => 1.6,
                    "midland" => 1.2,
                    _ => 1.0,
                };
                let base: f64 = rng.gen_range(5.0..45.0);
                table.set(day.index(), zone, base * relief);
            }
        }
    }
    table
}

/// Seeded nitrogen demand in kg N per hectare per day.  Peaks during the
/// virippu season (June to October), with a smaller puncha crop over the
/// winter months.
pub fn synthetic_demand(registry: &Registry, horizon: Horizon, seed: u64) -> DemandTable {
    let mut rng = SmallRng::seed_from_u64(seed.wrapping_mul(0x9e37_79b9));
    let mut table = DemandTable::zeros(horizon.num_days() as usize, registry.farms.len());

    for day in horizon.days() {
        let (month, _) = horizon.month_day(day);
        let seasonal = match month {
            6..=10 => 20.0,
            1..=3 | 12 => 14.0,
            _ => 6.0,
        };
        for farm in 0..registry.farms.len() {
            let noise: f64 = rng.gen_range(0.8..1.2);
            table.set(day.index(), FarmId(farm as u32), seasonal * noise);
        }
    }
    table
}
