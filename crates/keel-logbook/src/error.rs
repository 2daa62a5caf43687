use thiserror::Error;

/// Errors produced by logbook operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LogbookError {
    /// Signature or chain violation. An append that fails this way leaves
    /// the log at its last valid state; no partial entry is persisted.
    #[error("integrity violation: {reason}")]
    Integrity { reason: String },

    /// The operation itself is malformed (bad name, missing path, name
    /// already in use). Nothing is appended.
    #[error("invalid operation: {0}")]
    InvalidOp(String),

    /// The referenced dataset has no entries in the logbook.
    #[error("dataset {alias:?} not found in logbook")]
    NotFound { alias: String },

    /// The reference does not resolve to a current version.
    #[error("reference not found: {text}")]
    RefNotFound { text: String },

    /// A bare name is claimed by more than one known identity. Resolution
    /// requires an explicit owner.
    #[error("reference {name:?} is ambiguous, claimed by: {}", owners.join(", "))]
    AmbiguousRef { name: String, owners: Vec<String> },

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<keel_crypto::HashError> for LogbookError {
    fn from(err: keel_crypto::HashError) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type LogbookResult<T> = Result<T, LogbookError>;
