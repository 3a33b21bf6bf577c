use bl_core::Day;
use bl_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} covers {got} entries, scenario has {expected}")]
    CountMismatch {
        expected: usize,
        got: usize,
        what: &'static str,
    },

    /// The engine produced a shipment the state store rejected.  Fatal: the
    /// run stops with the ledger truncated at the last completed day.
    #[error("invariant violation on {day}: {source}")]
    Invariant {
        day: Day,
        #[source]
        source: StateError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
