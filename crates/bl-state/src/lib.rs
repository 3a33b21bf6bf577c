//! `bl-state` — the facility state store.
//!
//! Single source of truth for all state that changes while the year runs:
//! per-plant inventory, per-farm intake, and the cumulative carbon ledger.
//! The allocation engine reads it; only the simulation loop mutates it, and
//! every mutation goes through the three operations on [`FacilityStore`]
//! (`apply_production`, `apply_shipment`, `add_credits`).
//!
//! A rejected shipment ([`StateError`]) is not a recoverable condition — it
//! means the engine constructed an infeasible plan, and the simulation loop
//! treats it as fatal.

pub mod error;
pub mod store;


pub use error::{StateError, StateResult};
pub use store::{FacilityStore, OverflowEvent, StateSnapshot};
