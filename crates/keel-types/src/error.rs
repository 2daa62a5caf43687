use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors produced while parsing or validating dataset references.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    /// The reference string was empty. Callers must always name a dataset.
    #[error("reference is empty")]
    EmptyRef,

    #[error("{text:?} is not a valid dataset reference: {reason}")]
    InvalidRef { text: String, reason: String },

    #[error("invalid dataset name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid peername {name:?}: {reason}")]
    InvalidPeername { name: String, reason: String },
}
