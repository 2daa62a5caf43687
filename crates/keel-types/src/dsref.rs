//! Dataset references: the human-addressable names of the platform.
//!
//! A reference has the text form `[owner/]name[@ca:<hex>]`:
//! - `owner` is a peername; a reference without one is "bare" and can only
//!   resolve if exactly one known identity claims the name
//! - `name` is the dataset name, unique per owner within that owner's log
//! - the optional `@`-suffix pins an explicit, immutable version address
//!
//! Parsing performs syntax validation only. Canonicalization (filling in
//! `owner_id` and the resolved `path`) is done against the profile store
//! and the logbook by higher layers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::ContentAddress;
use crate::error::RefError;
use crate::identity::ProfileId;
use crate::names::{validate_dataset_name, validate_peername};

/// A parsed dataset reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dsref {
    /// Peername of the owning identity. Empty for bare references.
    pub owner: String,
    /// Canonical identity of the owner, filled by canonicalization.
    pub owner_id: Option<ProfileId>,
    /// Dataset name, unique per owner.
    pub name: String,
    /// Explicit version address, if the reference pins one.
    pub path: Option<ContentAddress>,
}

impl Dsref {
    /// Parse a reference from its text form.
    ///
    /// Returns [`RefError::EmptyRef`] for an empty string and
    /// [`RefError::InvalidRef`] for anything that does not match the
    /// `[owner/]name[@version]` grammar.
    pub fn parse(text: &str) -> Result<Self, RefError> {
        if text.is_empty() {
            return Err(RefError::EmptyRef);
        }

        let invalid = |reason: &str| RefError::InvalidRef {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let mut at_parts = text.splitn(2, '@');
        let head = at_parts.next().unwrap_or_default();
        let path = match at_parts.next() {
            None => None,
            Some("") => return Err(invalid("version suffix after '@' is empty")),
            Some(version) => Some(
                ContentAddress::from_hex(version)
                    .map_err(|e| invalid(&format!("bad version address: {e}")))?,
            ),
        };

        let (owner, name) = match head.split_once('/') {
            None => (String::new(), head.to_string()),
            Some((owner, name)) => {
                if owner.is_empty() {
                    return Err(invalid("owner segment is empty"));
                }
                if name.contains('/') {
                    return Err(invalid("too many path segments"));
                }
                (owner.to_string(), name.to_string())
            }
        };

        if name.is_empty() {
            return Err(invalid("dataset name is empty"));
        }
        if !owner.is_empty() {
            validate_peername(&owner)?;
        }
        validate_dataset_name(&name)?;

        Ok(Self {
            owner,
            owner_id: None,
            name,
            path,
        })
    }

    /// Construct a reference from owner and name parts, without parsing.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            owner_id: None,
            name: name.into(),
            path: None,
        }
    }

    /// Returns `true` if the reference names no owner.
    pub fn is_bare(&self) -> bool {
        self.owner.is_empty() && self.owner_id.is_none()
    }

    /// Returns `true` if the owner identity has been canonicalized.
    pub fn is_canonical(&self) -> bool {
        self.owner_id.is_some()
    }

    /// The `owner/name` part without any version suffix.
    pub fn alias(&self) -> String {
        if self.owner.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.owner, self.name)
        }
    }
}

impl fmt::Display for Dsref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias())?;
        if let Some(path) = &self.path {
            write!(f, "@{path}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_owner_and_name() {
        let r = Dsref::parse("b5/world_bank_population").unwrap();
        assert_eq!(r.owner, "b5");
        assert_eq!(r.name, "world_bank_population");
        assert!(r.path.is_none());
        assert!(r.owner_id.is_none());
    }

    #[test]
    fn parse_bare_name() {
        let r = Dsref::parse("airport-codes").unwrap();
        assert!(r.is_bare());
        assert_eq!(r.name, "airport-codes");
    }

    #[test]
    fn parse_with_version() {
        let addr = ContentAddress::for_content(b"v1");
        let text = format!("b5/population@{}", addr.to_hex());
        let r = Dsref::parse(&text).unwrap();
        assert_eq!(r.path, Some(addr));
    }

    #[test]
    fn empty_ref_is_distinct_error() {
        assert_eq!(Dsref::parse("").unwrap_err(), RefError::EmptyRef);
    }

    #[test]
    fn reject_malformed_refs() {
        assert!(Dsref::parse("/name").is_err());
        assert!(Dsref::parse("owner/").is_err());
        assert!(Dsref::parse("a/b/c").is_err());
        assert!(Dsref::parse("owner/name@").is_err());
        assert!(Dsref::parse("owner/name@nothex").is_err());
        assert!(Dsref::parse("owner/Bad Name").is_err());
    }

    #[test]
    fn display_roundtrip() {
        let addr = ContentAddress::for_content(b"body");
        let text = format!("b5/population@{}", addr.to_hex());
        let r = Dsref::parse(&text).unwrap();
        assert_eq!(r.to_string(), text);
        assert_eq!(Dsref::parse(&r.to_string()).unwrap(), r);
    }

    #[test]
    fn alias_drops_version() {
        let addr = ContentAddress::for_content(b"body");
        let r = Dsref::parse(&format!("b5/population@{}", addr.to_hex())).unwrap();
        assert_eq!(r.alias(), "b5/population");
    }

    proptest! {
        #[test]
        fn parse_display_roundtrip(
            owner in "[a-z][a-z0-9_-]{0,15}[a-z0-9]",
            name in "[a-z][a-z0-9_-]{0,15}[a-z0-9]",
            body in proptest::collection::vec(any::<u8>(), 0..64),
            with_version in any::<bool>(),
        ) {
            let mut text = format!("{owner}/{name}");
            if with_version {
                text.push('@');
                text.push_str(&ContentAddress::for_content(&body).to_hex());
            }
            let parsed = Dsref::parse(&text).unwrap();
            prop_assert_eq!(parsed.to_string(), text.clone());
            prop_assert_eq!(Dsref::parse(&parsed.to_string()).unwrap(), parsed);
        }
    }
}
