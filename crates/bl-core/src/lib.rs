//! `bl-core` — foundational types for the `biologistics` workspace.
//!
//! This crate is a dependency of every other `bl-*` crate.  It intentionally
//! has no `bl-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                           |
//! |-------------|----------------------------------------------------|
//! | [`ids`]     | `StpId`, `FarmId`                                  |
//! | [`geo`]     | `GeoPoint`, haversine distance                     |
//! | [`date`]    | `Day`, `Horizon` (one-calendar-year day counter)   |
//! | [`error`]   | `BlError`, `BlResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                  |
//! |---------|---------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.     |

pub mod date;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use date::{Day, Horizon};
pub use error::{BlError, BlResult};
pub use geo::GeoPoint;
pub use ids::{FarmId, StpId};
