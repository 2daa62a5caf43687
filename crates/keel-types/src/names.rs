//! Name validation for datasets and peernames.
//!
//! Valid dataset names:
//! - Must be non-empty and at most 144 characters
//! - Lowercase letters, digits, `-` and `_` only
//! - Must start with a letter
//! - Must not end with `-` or `_`
//!
//! Peernames follow the same rules. Names this strict stay unambiguous in
//! reference strings, URLs, and filesystem paths alike.

use crate::error::RefError;

/// Maximum length of a dataset name or peername.
pub const MAX_NAME_LENGTH: usize = 144;

/// Validate a dataset name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use keel_types::names::validate_dataset_name;
///
/// assert!(validate_dataset_name("world_bank_population").is_ok());
/// assert!(validate_dataset_name("airport-codes-2024").is_ok());
/// assert!(validate_dataset_name("").is_err());
/// assert!(validate_dataset_name("No Spaces").is_err());
/// ```
pub fn validate_dataset_name(name: &str) -> Result<(), RefError> {
    check_name(name).map_err(|reason| RefError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Validate a peername. Same rules as dataset names.
pub fn validate_peername(name: &str) -> Result<(), RefError> {
    check_name(name).map_err(|reason| RefError::InvalidPeername {
        name: name.to_string(),
        reason,
    })
}

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".into());
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(format!("must be at most {MAX_NAME_LENGTH} characters"));
    }

    let first = name.chars().next().unwrap_or_default();
    if !first.is_ascii_lowercase() {
        return Err("must start with a lowercase letter".into());
    }

    if name.ends_with('-') || name.ends_with('_') {
        return Err("must not end with '-' or '_'".into());
    }

    for ch in name.chars() {
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_') {
            return Err(format!("contains forbidden character: {ch:?}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_simple_names() {
        assert!(validate_dataset_name("population").is_ok());
        assert!(validate_dataset_name("airport-codes").is_ok());
        assert!(validate_dataset_name("world_bank_2024").is_ok());
        assert!(validate_dataset_name("a").is_ok());
    }

    #[test]
    fn reject_empty_name() {
        assert!(validate_dataset_name("").is_err());
    }

    #[test]
    fn reject_uppercase() {
        assert!(validate_dataset_name("Population").is_err());
        assert!(validate_dataset_name("popULation").is_err());
    }

    #[test]
    fn reject_leading_digit_or_symbol() {
        assert!(validate_dataset_name("2024-codes").is_err());
        assert!(validate_dataset_name("-codes").is_err());
        assert!(validate_dataset_name("_codes").is_err());
    }

    #[test]
    fn reject_trailing_separator() {
        assert!(validate_dataset_name("codes-").is_err());
        assert!(validate_dataset_name("codes_").is_err());
    }

    #[test]
    fn reject_whitespace_and_punctuation() {
        assert!(validate_dataset_name("has space").is_err());
        assert!(validate_dataset_name("has/slash").is_err());
        assert!(validate_dataset_name("has.dot").is_err());
        assert!(validate_dataset_name("has@at").is_err());
    }

    #[test]
    fn reject_over_length() {
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_dataset_name(&long).is_err());
        let max = "a".repeat(MAX_NAME_LENGTH);
        assert!(validate_dataset_name(&max).is_ok());
    }

    #[test]
    fn peername_error_variant() {
        let err = validate_peername("Bad Name").unwrap_err();
        assert!(matches!(err, RefError::InvalidPeername { .. }));
    }
}
