//! Domain identifier types with validation
//!
//! [`IdentityKey`] is the deduplication key of an ingested record. It wraps a
//! non-empty string so an unvalidated value can never reach the seen-set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identity of a record used for deduplication
///
/// Equal keys mean the same entity; only the first-seen record is retained.
///
/// # Examples
///
/// ```
/// use harvest::domain::ids::IdentityKey;
/// use std::str::FromStr;
///
/// let key = IdentityKey::from_str("1042").unwrap();
/// assert_eq!(key.as_str(), "1042");
/// assert!(IdentityKey::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Creates a new IdentityKey, rejecting blank input
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Identity key cannot be empty".to_string());
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdentityKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_key_rejects_blank() {
        assert!(IdentityKey::new("").is_err());
        assert!(IdentityKey::new(" \t").is_err());
    }

    #[test]
    fn test_identity_key_hash_eq() {
        let mut seen = HashSet::new();
        assert!(seen.insert(IdentityKey::new("7").unwrap()));
        assert!(!seen.insert(IdentityKey::from_str("7").unwrap()));
        assert!(seen.insert(IdentityKey::new("8").unwrap()));
    }

    #[test]
    fn test_identity_key_display() {
        let key = IdentityKey::new("user-1").unwrap();
        assert_eq!(key.to_string(), "user-1");
        assert_eq!(key.into_inner(), "user-1");
    }
}
