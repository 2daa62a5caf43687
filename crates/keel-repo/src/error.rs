use thiserror::Error;

use keel_logbook::LogbookError;
use keel_profile::ProfileError;
use keel_store::StoreError;

/// Errors produced by the repository facade.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepoError {
    /// The logbook has been detached; local references cannot resolve.
    #[error("cannot resolve local references without a logbook")]
    NoLogbook,

    /// A subsystem failed during shutdown.
    #[error("{subsystem} shutdown failed: {reason}")]
    Shutdown {
        subsystem: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Logbook(#[from] LogbookError),

    #[error("profile error: {0}")]
    Profile(String),

    #[error("store error: {0}")]
    Store(String),
}

impl From<ProfileError> for RepoError {
    fn from(err: ProfileError) -> Self {
        Self::Profile(err.to_string())
    }
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
