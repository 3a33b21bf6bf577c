//! `bl-sim` — the day loop orchestrator for the biologistics workspace.
//!
//! # The daily cycle
//!
//! ```text
//! for day in Jan 1 ..= Dec 31:
//!   ① Production — each plant gains its daily output; excess over capacity
//!                  becomes an OverflowEvent (clamped, penalized, not fatal).
//!   ② Rain locks — today's per-farm availability from the weather table.
//!   ③ Planning   — AllocationEngine builds the day's shipment set.
//!   ④ Apply      — every shipment goes through the FacilityStore; a
//!                  rejection is an engine bug and aborts the run.
//!   ⑤ Record     — snapshot state into a DayRecord, append to the Ledger.
//! ```
//!
//! Days are strictly sequential — each day's plan depends on the previous
//! day's end state, so there is no parallelism across days by design.  A
//! run over identical inputs is fully deterministic.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bl_engine::{EngineParams, NetCarbonModel};
//! use bl_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, registry, weather, demand, NetCarbonModel)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! let ledger = sim.ledger;
//! ```

pub mod builder;
pub mod error;
pub mod ledger;
pub mod observer;
pub mod record;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use ledger::Ledger;
pub use observer::{NoopObserver, SimObserver};
pub use record::DayRecord;
pub use sim::Sim;
