use thiserror::Error;

/// Errors produced by filesystem operations.
///
/// Cloneable so the terminal error can be reported both to the failing
/// caller and later through `done_err()`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("filesystem is closed")]
    Closed,

    #[error("stored content does not match its address {address}")]
    Corruption { address: String },

    #[error("I/O error: {0}")]
    Io(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
