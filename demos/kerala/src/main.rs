//! kerala — synthetic one-year biosolid logistics run.
//!
//! Three sewage treatment plants ship biosolids to twelve paddy farms
//! across Kerala's coastal, midland, and highland zones for a full
//! calendar year.  Weather and nitrogen demand are seeded synthetic data;
//! swap in real registry and weather CSVs via `bl_data` loaders to run an
//! actual district scenario.

mod scenario;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use bl_core::{Day, Horizon, StpId};
use bl_data::ScenarioConfig;
use bl_engine::NetCarbonModel;
use bl_output::{CsvWriter, OutputWriter, SimOutputObserver};
use bl_sim::{DayRecord, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED: u64 = 42;
const OUTPUT_DIR: &str = "output/kerala";

// ── Observer wrapper for progress and run totals ──────────────────────────────

struct ProgressObserver<W: OutputWriter> {
    inner: SimOutputObserver<W>,
    horizon: Horizon,
    shipment_rows: usize,
    delivered_tons: f64,
    emissions_kg: f64,
    penalties_kg: f64,
    overflow_events: usize,
    rain_locked_farm_days: u64,
}

impl<W: OutputWriter> ProgressObserver<W> {
    fn new(inner: SimOutputObserver<W>, horizon: Horizon) -> Self {
        Self {
            inner,
            horizon,
            shipment_rows: 0,
            delivered_tons: 0.0,
            emissions_kg: 0.0,
            penalties_kg: 0.0,
            overflow_events: 0,
            rain_locked_farm_days: 0,
        }
    }
}

impl<W: OutputWriter> SimObserver for ProgressObserver<W> {
    fn on_day_start(&mut self, day: Day) {
        self.inner.on_day_start(day);
    }

    fn on_day_end(&mut self, record: &DayRecord) {
        self.shipment_rows += record.shipments.len();
        self.delivered_tons += record.delivered_tons;
        self.emissions_kg += record.emissions_kg;
        self.penalties_kg += record.penalties_kg;
        self.overflow_events += record.overflows.len();
        self.rain_locked_farm_days += record.rain_locked_farms as u64;

        // Print a line at each month boundary.
        let next = record.day.next();
        let month_over =
            !self.horizon.contains(next) || self.horizon.month_day(next).1 == 1;
        if month_over {
            let (month, _) = self.horizon.month_day(record.day);
            println!(
                "  {} month {:>2} | credits {:>12.1} kg | locked farm-days {:>4}",
                self.horizon.date_string(record.day),
                month,
                record.credits_cum,
                self.rain_locked_farm_days,
            );
        }

        self.inner.on_day_end(record);
    }

    fn on_sim_end(&mut self, days_completed: usize) {
        self.inner.on_sim_end(days_completed);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== kerala — biosolid logistics, synthetic district ===");

    // 1. Scenario constants and registry.
    let config = ScenarioConfig::default();
    let horizon = Horizon::new(config.horizon_year);
    let registry = scenario::build_registry()?;
    println!(
        "Registry: {} plants, {} farms, {} zones  |  Year: {} ({} days)  |  Seed: {}",
        registry.stps.len(),
        registry.farms.len(),
        registry.zones.len(),
        horizon.year,
        horizon.num_days(),
        SEED,
    );

    // 2. Seeded synthetic weather and demand.
    let weather = scenario::synthetic_weather(&registry, horizon, SEED);
    let demand = scenario::synthetic_demand(&registry, horizon, SEED);

    // 3. Build sim.
    let mut sim = SimBuilder::new(config, registry, weather, demand, NetCarbonModel).build()?;

    // 4. Set up output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let stp_names: Vec<String> = sim.registry.stps.iter().map(|s| s.name.clone()).collect();
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR), &stp_names)?;
    let inner = SimOutputObserver::new(writer, &sim.registry, sim.horizon);
    let mut obs = ProgressObserver::new(inner, sim.horizon);
    println!();

    // 5. Run the full year.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let last = sim
        .ledger
        .last()
        .ok_or_else(|| anyhow::anyhow!("run produced no ledger records"))?;
    println!();
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  net credits         : {:>12.1} kg CO2e", last.credits_cum);
    println!("  delivered           : {:>12.1} t", obs.delivered_tons);
    println!("  shipments           : {:>12}", obs.shipment_rows);
    println!("  transport emissions : {:>12.1} kg CO2e", obs.emissions_kg);
    println!("  penalties           : {:>12.1} kg CO2e", obs.penalties_kg);
    println!("  overflow events     : {:>12}", obs.overflow_events);
    println!("  rain-locked farm-days: {:>11}", obs.rain_locked_farm_days);

    // 7. Final plant storage table.
    println!();
    println!("{:<10} {:>12} {:>10}", "Plant", "Inventory t", "Fill");
    println!("{}", "-".repeat(34));
    for (i, stp) in sim.registry.stps.iter().enumerate() {
        let inv = sim.store.inventory_tons(StpId(i as u16));
        println!(
            "{:<10} {:>12.1} {:>9.1}%",
            stp.name,
            inv,
            100.0 * inv / stp.storage_max_tons
        );
    }

    // 8. Machine-readable summary next to the CSV output.
    let summary = serde_json::json!({
        "year": sim.horizon.year,
        "days": sim.ledger.len(),
        "net_credits_kg_co2e": last.credits_cum,
        "delivered_tons": obs.delivered_tons,
        "shipments": obs.shipment_rows,
        "transport_emissions_kg_co2e": obs.emissions_kg,
        "penalties_kg_co2e": obs.penalties_kg,
        "overflow_events": obs.overflow_events,
        "rain_locked_farm_days": obs.rain_locked_farm_days,
    });
    let summary_path = Path::new(OUTPUT_DIR).join("summary_metrics.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!();
    println!("Wrote {}", summary_path.display());

    Ok(())
}
