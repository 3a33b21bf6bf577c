//! Workspace error type.
//!
//! Sub-crates may define their own error enums and convert them into `BlError`
//! via `From` impls, or keep them separate and wrap `BlError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `bl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum BlError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `bl-*` crates.
pub type BlResult<T> = Result<T, BlError>;
