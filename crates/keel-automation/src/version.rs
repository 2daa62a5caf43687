use thiserror::Error;

use keel_repo::{Repo, RepoError};
use keel_types::{ContentAddress, Dsref, RefError};

/// Errors from automation-side dataset lookups.
#[derive(Debug, Error, PartialEq)]
pub enum AutomationError {
    #[error(transparent)]
    Reference(#[from] RefError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type AutomationResult<T> = Result<T, AutomationError>;

/// The current head version of a dataset, by reference text.
///
/// Trigger evaluation only ever consumes resolution results; it never
/// walks logs itself. `Ok(None)` means the dataset exists but has no
/// committed version yet, which for change-triggers is "nothing to do".
pub fn latest_version(repo: &Repo, reference: &str) -> AutomationResult<Option<ContentAddress>> {
    let mut parsed = Dsref::parse(reference)?;
    repo.resolve_ref(&mut parsed)?;
    Ok(parsed.path)
}
