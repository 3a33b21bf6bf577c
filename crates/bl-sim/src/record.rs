//! The per-day output record.

use bl_core::Day;
use bl_engine::Shipment;
use bl_state::OverflowEvent;

/// Everything that happened on one simulated day.
///
/// Produced by the simulation loop, owned thereafter by the
/// [`Ledger`](crate::Ledger) and never mutated again.  Downstream reporting and
/// visualization consume these records read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub day: Day,
    /// The day's applied shipments, in the engine's dispatch order.
    pub shipments: Vec<Shipment>,
    /// Per-plant inventory after shipments, tons, indexed by `StpId`.
    pub stp_inventory_tons: Vec<f64>,
    /// Cumulative carbon credits after today's delta, kg CO₂e.
    pub credits_cum: f64,

    // ── Today's delta, by channel ─────────────────────────────────────────
    /// Credits earned today (uptake offset + soil carbon).
    pub credits_kg: f64,
    /// Transport emissions today.
    pub emissions_kg: f64,
    /// Penalties today: leaching plus any overflow penalty.
    pub penalties_kg: f64,

    /// Total mass delivered today, tons.
    pub delivered_tons: f64,
    /// Plants whose production exceeded storage capacity today.
    pub overflows: Vec<OverflowEvent>,
    /// Farms unavailable today because of rain.
    pub rain_locked_farms: u32,
}

impl DayRecord {
    /// Net carbon delta booked for this day.
    #[inline]
    pub fn net_kg(&self) -> f64 {
        self.credits_kg - self.emissions_kg - self.penalties_kg
    }

    /// Total excess mass discarded to overflow today, tons.
    pub fn overflow_tons(&self) -> f64 {
        self.overflows.iter().map(|o| o.excess_tons).sum()
    }
}
