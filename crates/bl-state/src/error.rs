use bl_core::{FarmId, StpId};
use thiserror::Error;

/// Invariant violations raised when a shipment cannot be applied.
///
/// These indicate a bug in whatever constructed the shipment, not a domain
/// occurrence; the day loop aborts the run on the first one.
#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("plant {stp} holds {available_tons} t, shipment wants {requested_tons} t")]
    InsufficientInventory {
        stp: StpId,
        requested_tons: f64,
        available_tons: f64,
    },

    #[error("farm {farm} unavailable: {reason}")]
    FarmUnavailable { farm: FarmId, reason: &'static str },
}

pub type StateResult<T> = Result<T, StateError>;
