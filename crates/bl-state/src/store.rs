//! The `FacilityStore` — mutable per-facility state for one simulation run.

use bl_core::{FarmId, StpId};
use bl_data::Registry;

use crate::{StateError, StateResult};

/// Slack for floating-point capacity comparisons.  A shipment a few
/// nanograms over the residual intake is rounding noise, not a violation.
const EPS_TONS: f64 = 1e-9;

/// A plant's production exceeding its storage capacity on one day.
///
/// Recorded in the day record as a warning-level event; the excess mass is
/// discarded (inventory is clamped at capacity).  Never an `Err`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowEvent {
    pub stp: StpId,
    pub excess_tons: f64,
}

/// Immutable end-of-day view of the store, as captured into a day record.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// Per-plant inventory, tons, indexed by [`StpId`].
    pub stp_inventory_tons: Vec<f64>,
    /// Cumulative carbon credits, kg CO₂e.
    pub credits_cum: f64,
}

/// All mutable simulation state, in column vectors indexed by ID.
///
/// Static bounds (capacities, production rates, intake limits) are copied out
/// of the [`Registry`] at construction so the hot loop never chases a
/// reference into registry structs.
pub struct FacilityStore {
    // ── Static bounds ─────────────────────────────────────────────────────
    stp_capacity_tons: Vec<f64>,
    stp_production_tons: Vec<f64>,
    farm_daily_intake_tons: Vec<f64>,

    // ── Mutable state ─────────────────────────────────────────────────────
    stp_inventory_tons: Vec<f64>,
    farm_intake_today_tons: Vec<f64>,
    farm_total_tons: Vec<f64>,
    farm_locked_today: Vec<bool>,
    credits_cum: f64,
}

impl FacilityStore {
    /// Create a store with every plant empty and every farm unlocked.
    pub fn new(registry: &Registry) -> Self {
        Self {
            stp_capacity_tons: registry.stps.iter().map(|s| s.storage_max_tons).collect(),
            stp_production_tons: registry.stps.iter().map(|s| s.daily_output_tons).collect(),
            farm_daily_intake_tons: registry.farms.iter().map(|f| f.daily_intake_tons).collect(),
            stp_inventory_tons: vec![0.0; registry.stp_count()],
            farm_intake_today_tons: vec![0.0; registry.farm_count()],
            farm_total_tons: vec![0.0; registry.farm_count()],
            farm_locked_today: vec![false; registry.farm_count()],
            credits_cum: 0.0,
        }
    }

    // ── Day-cycle operations ──────────────────────────────────────────────

    /// Add each plant's daily production, clamping at capacity.
    ///
    /// Returns one [`OverflowEvent`] per plant whose inventory would have
    /// exceeded capacity; the excess is discarded.
    pub fn apply_production(&mut self) -> Vec<OverflowEvent> {
        let mut overflows = Vec::new();
        for (i, inv) in self.stp_inventory_tons.iter_mut().enumerate() {
            *inv += self.stp_production_tons[i];
            let cap = self.stp_capacity_tons[i];
            if *inv > cap {
                overflows.push(OverflowEvent {
                    stp: StpId(i as u16),
                    excess_tons: *inv - cap,
                });
                *inv = cap;
            }
        }
        overflows
    }

    /// Start a new day: reset per-farm intake and install today's rain locks.
    ///
    /// `locked` is indexed by [`FarmId`] and must cover every farm.
    pub fn begin_day(&mut self, locked: &[bool]) {
        debug_assert_eq!(locked.len(), self.farm_locked_today.len());
        self.farm_intake_today_tons.fill(0.0);
        self.farm_locked_today.copy_from_slice(locked);
    }

    /// Atomically move `tons` from plant `stp` to farm `farm`.
    ///
    /// # Errors
    ///
    /// - [`StateError::InsufficientInventory`] if the plant holds less.
    /// - [`StateError::FarmUnavailable`] if the farm is rain-locked or the
    ///   shipment exceeds its residual daily intake.
    ///
    /// On error nothing is mutated — a shipment is applied whole or not at
    /// all.
    pub fn apply_shipment(&mut self, stp: StpId, farm: FarmId, tons: f64) -> StateResult<()> {
        let available = self.stp_inventory_tons[stp.index()];
        if tons > available + EPS_TONS {
            return Err(StateError::InsufficientInventory {
                stp,
                requested_tons: tons,
                available_tons: available,
            });
        }
        if self.farm_locked_today[farm.index()] {
            return Err(StateError::FarmUnavailable { farm, reason: "rain-locked" });
        }
        let residual = self.residual_intake_tons(farm);
        if tons > residual + EPS_TONS {
            return Err(StateError::FarmUnavailable {
                farm,
                reason: "daily intake capacity exhausted",
            });
        }

        self.stp_inventory_tons[stp.index()] = (available - tons).max(0.0);
        self.farm_intake_today_tons[farm.index()] += tons;
        self.farm_total_tons[farm.index()] += tons;
        Ok(())
    }

    /// Credit (or debit, if negative) the carbon ledger.
    #[inline]
    pub fn add_credits(&mut self, delta_kg_co2: f64) {
        self.credits_cum += delta_kg_co2;
    }

    /// Capture the immutable end-of-day view for the day record.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            stp_inventory_tons: self.stp_inventory_tons.clone(),
            credits_cum: self.credits_cum,
        }
    }

    // ── Read accessors (used by the allocation engine) ────────────────────

    #[inline]
    pub fn inventory_tons(&self, stp: StpId) -> f64 {
        self.stp_inventory_tons[stp.index()]
    }

    #[inline]
    pub fn capacity_tons(&self, stp: StpId) -> f64 {
        self.stp_capacity_tons[stp.index()]
    }

    /// Storage occupancy in `[0, 1]`.
    #[inline]
    pub fn fill_ratio(&self, stp: StpId) -> f64 {
        let cap = self.stp_capacity_tons[stp.index()];
        if cap > 0.0 { self.stp_inventory_tons[stp.index()] / cap } else { 0.0 }
    }

    /// Tons the farm can still accept today.
    #[inline]
    pub fn residual_intake_tons(&self, farm: FarmId) -> f64 {
        (self.farm_daily_intake_tons[farm.index()] - self.farm_intake_today_tons[farm.index()])
            .max(0.0)
    }

    #[inline]
    pub fn is_locked(&self, farm: FarmId) -> bool {
        self.farm_locked_today[farm.index()]
    }

    /// Year-to-date tons delivered to `farm`.
    #[inline]
    pub fn farm_total_tons(&self, farm: FarmId) -> f64 {
        self.farm_total_tons[farm.index()]
    }

    #[inline]
    pub fn credits_cum(&self) -> f64 {
        self.credits_cum
    }

    #[inline]
    pub fn stp_count(&self) -> usize {
        self.stp_inventory_tons.len()
    }

    #[inline]
    pub fn farm_count(&self) -> usize {
        self.farm_intake_today_tons.len()
    }
}
