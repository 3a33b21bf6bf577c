//! `bl-engine` — the daily allocation engine.
//!
//! Given the facility state after production and today's rain locks, decide
//! which plant ships how much to which farm.  The engine only *plans*: it
//! returns a [`DayPlan`] of feasible shipments plus the day's carbon
//! accounting, and the simulation loop applies them through the state store.
//! A plan the store rejects is an engine bug, never an expected outcome.
//!
//! # Algorithm
//!
//! Plants are served in descending storage-occupancy order (the fullest tank
//! is the most urgent).  For each plant, every eligible farm — not
//! rain-locked, residual intake left, not already served today — is scored
//! by the pluggable [`ScoringModel`]; shipments are assigned greedily, best
//! score first, each sized to the lesser of remaining plant inventory and
//! residual farm intake.  A delivery with a negative score is only made when
//! the plant is close to overflowing ([`EngineParams::panic_fill_ratio`]).
//!
//! All orderings carry an ID tie-break, so two runs over the same inputs
//! produce identical plans — including under the `parallel` feature, which
//! moves only the side-effect-free scoring pass onto Rayon's thread pool.

pub mod engine;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use engine::{AllocationEngine, DayPlan, EngineParams, PlanningContext, Shipment};
pub use scoring::{DeliveryContext, DeliveryImpact, NetCarbonModel, ScoringModel, truck_count};
