use serde::{Deserialize, Serialize};
use thiserror::Error;

use keel_logbook::LogbookError;
use keel_repo::RepoError;
use keel_types::RefError;

/// Errors surfaced by the request layer, local or remote.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("reference is required")]
    EmptyReference,

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("reference not found: {0}")]
    RefNotFound(String),

    #[error("ambiguous reference: {0}")]
    AmbiguousReference(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("cannot resolve local references without a logbook")]
    NoLogbook,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("remote failure: {0}")]
    Internal(String),
}

/// Stable error category carried across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultCode {
    EmptyRef,
    InvalidRef,
    NotFound,
    RefNotFound,
    AmbiguousRef,
    Integrity,
    NoLogbook,
    Transport,
    Internal,
}

/// Serializable form of a request-layer error.
///
/// A fault round-trips losslessly: the code preserves the category for
/// programmatic handling on the far side, the message preserves the detail.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Fault {
    pub code: FaultCode,
    pub message: String,
}

impl Fault {
    pub fn new(code: FaultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<RemoteError> for Fault {
    fn from(err: RemoteError) -> Self {
        // Payload variants carry the bare detail, not their display form:
        // a fault forwarded across several hops must never stack prefixes.
        match err {
            RemoteError::EmptyReference => Self::new(FaultCode::EmptyRef, "reference is required"),
            RemoteError::InvalidReference(detail) => Self::new(FaultCode::InvalidRef, detail),
            RemoteError::NotFound(detail) => Self::new(FaultCode::NotFound, detail),
            RemoteError::RefNotFound(detail) => Self::new(FaultCode::RefNotFound, detail),
            RemoteError::AmbiguousReference(detail) => Self::new(FaultCode::AmbiguousRef, detail),
            RemoteError::Integrity(detail) => Self::new(FaultCode::Integrity, detail),
            RemoteError::NoLogbook => Self::new(
                FaultCode::NoLogbook,
                "cannot resolve local references without a logbook",
            ),
            RemoteError::Transport(detail) => Self::new(FaultCode::Transport, detail),
            RemoteError::Internal(detail) => Self::new(FaultCode::Internal, detail),
        }
    }
}

impl From<Fault> for RemoteError {
    fn from(fault: Fault) -> Self {
        match fault.code {
            FaultCode::EmptyRef => Self::EmptyReference,
            FaultCode::InvalidRef => Self::InvalidReference(fault.message),
            FaultCode::NotFound => Self::NotFound(fault.message),
            FaultCode::RefNotFound => Self::RefNotFound(fault.message),
            FaultCode::AmbiguousRef => Self::AmbiguousReference(fault.message),
            FaultCode::Integrity => Self::Integrity(fault.message),
            FaultCode::NoLogbook => Self::NoLogbook,
            FaultCode::Transport => Self::Transport(fault.message),
            FaultCode::Internal => Self::Internal(fault.message),
        }
    }
}

impl From<RefError> for RemoteError {
    fn from(err: RefError) -> Self {
        match err {
            RefError::EmptyRef => Self::EmptyReference,
            other => Self::InvalidReference(other.to_string()),
        }
    }
}

impl From<LogbookError> for RemoteError {
    fn from(err: LogbookError) -> Self {
        match err {
            LogbookError::NotFound { alias } => Self::NotFound(alias),
            LogbookError::RefNotFound { text } => Self::RefNotFound(text),
            LogbookError::AmbiguousRef { .. } => Self::AmbiguousReference(err.to_string()),
            LogbookError::Integrity { reason } => Self::Integrity(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<RepoError> for RemoteError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NoLogbook => Self::NoLogbook,
            RepoError::Logbook(inner) => inner.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
