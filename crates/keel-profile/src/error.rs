use thiserror::Error;

/// Errors produced by profile store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile not found")]
    NotFound,

    #[error("peername {0:?} is already in use")]
    PeernameTaken(String),

    #[error(transparent)]
    InvalidName(#[from] keel_types::RefError),
}

pub type ProfileResult<T> = Result<T, ProfileError>;
