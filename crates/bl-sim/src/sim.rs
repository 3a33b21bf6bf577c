//! The `Sim` struct and its day loop.

use bl_core::{Day, FarmId, Horizon};
use bl_data::{DemandTable, Registry, ScenarioConfig, WeatherTable};
use bl_engine::{AllocationEngine, PlanningContext, ScoringModel};
use bl_state::FacilityStore;

use crate::{DayRecord, Ledger, SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// Holds all scenario inputs plus the one shared mutable resource (the
/// [`FacilityStore`]) and drives the daily cycle from January 1 to
/// December 31.  Create via [`SimBuilder`][crate::SimBuilder].
///
/// A `Sim` advances monotonically: `ledger.len()` is the next day to run,
/// and a finished run leaves the full year in [`Sim::ledger`].  Re-running
/// a completed sim is a no-op; repeating a run from scratch with identical
/// inputs reproduces the ledger exactly.
pub struct Sim<M: ScoringModel> {
    pub config: ScenarioConfig,
    pub horizon: Horizon,
    pub registry: Registry,
    pub weather: WeatherTable,
    pub demand: DemandTable,

    /// The only mutable simulation state.
    pub store: FacilityStore,
    pub engine: AllocationEngine<M>,

    /// Append-only day records, one per completed day.
    pub ledger: Ledger,
}

impl<M: ScoringModel> Sim<M> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current position to the end of the horizon.
    ///
    /// Calls observer hooks at every day boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// # Errors
    ///
    /// [`SimError::Invariant`] if the engine hands the store an infeasible
    /// shipment.  The ledger keeps every day completed before the failure.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while (self.ledger.len() as u16) < self.horizon.num_days() {
            let day = Day(self.ledger.len() as u16);
            observer.on_day_start(day);
            let record = self.process_day(day)?;
            observer.on_day_end(&record);
            self.ledger.push(record);
        }
        observer.on_sim_end(self.ledger.len());
        Ok(())
    }

    /// Run exactly `n` days from the current position (stops early at the
    /// horizon end).  Useful for tests and incremental stepping.
    pub fn run_days<O: SimObserver>(&mut self, n: u16, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            if self.ledger.len() as u16 >= self.horizon.num_days() {
                break;
            }
            let day = Day(self.ledger.len() as u16);
            observer.on_day_start(day);
            let record = self.process_day(day)?;
            observer.on_day_end(&record);
            self.ledger.push(record);
        }
        Ok(())
    }

    // ── Core day processing ───────────────────────────────────────────────

    fn process_day(&mut self, day: Day) -> SimResult<DayRecord> {
        // ── ① Production (clamped at capacity) ────────────────────────────
        let overflows = self.store.apply_production();

        // ── ② Today's rain locks ──────────────────────────────────────────
        let threshold = self.config.thresholds.rain_lock_threshold_mm;
        let window = self.config.thresholds.forecast_window_days;
        let locked: Vec<bool> = self
            .registry
            .farms
            .iter()
            .map(|farm| self.weather.rain_locked(day.index(), farm.zone, threshold, window))
            .collect();
        let rain_locked_farms = locked.iter().filter(|&&l| l).count() as u32;
        self.store.begin_day(&locked);

        // ── ③ Plan ────────────────────────────────────────────────────────
        let ctx = PlanningContext {
            day,
            registry: &self.registry,
            demand: &self.demand,
            config: &self.config,
        };
        let plan = self.engine.plan_day(&ctx, &self.store);

        // ── ④ Apply (sequential; store is the last line of defense) ───────
        for shipment in &plan.shipments {
            self.store
                .apply_shipment(shipment.stp, shipment.farm, shipment.tons)
                .map_err(|source| SimError::Invariant { day, source })?;
        }

        // ── ⑤ Book the day's carbon delta and snapshot ────────────────────
        let overflow_penalty_kg = overflows
            .iter()
            .map(|o| o.excess_tons * self.config.thresholds.stp_overflow_penalty_kg_co2_per_ton)
            .sum::<f64>();
        let penalties_kg = plan.penalties_kg + overflow_penalty_kg;
        let delivered_tons = plan.shipments.iter().map(|s| s.tons).sum();

        self.store
            .add_credits(plan.credits_kg - plan.emissions_kg - penalties_kg);
        let snapshot = self.store.snapshot();

        Ok(DayRecord {
            day,
            shipments: plan.shipments,
            stp_inventory_tons: snapshot.stp_inventory_tons,
            credits_cum: snapshot.credits_cum,
            credits_kg: plan.credits_kg,
            emissions_kg: plan.emissions_kg,
            penalties_kg,
            delivered_tons,
            overflows,
            rain_locked_farms,
        })
    }

    // ── Convenience accessors ─────────────────────────────────────────────

    /// Year-to-date tons delivered to `farm`.
    pub fn farm_total_tons(&self, farm: FarmId) -> f64 {
        self.store.farm_total_tons(farm)
    }

    /// `true` once every day of the horizon has a ledger record.
    pub fn is_complete(&self) -> bool {
        self.ledger.len() as u16 == self.horizon.num_days()
    }
}
