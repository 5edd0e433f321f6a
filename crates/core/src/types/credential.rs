//! Payment platform credential types.
//!
//! Type-safe wrapper for the secret key used to authenticate against the
//! external payment catalog.

use serde::{Deserialize, Serialize};

/// Prefix every secret key issued by the payment platform carries.
pub const SECRET_KEY_PREFIX: &str = "sk_";

/// Payment platform secret key.
///
/// The key is persisted alongside the tenant snapshot, so it serializes
/// transparently; `Debug` never prints it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a raw secret key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Access the raw key for an outgoing request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` when no key has been provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when the key follows the platform's secret-key format.
    ///
    /// Only usable keys are ever sent to the payment catalog.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.0.starts_with(SECRET_KEY_PREFIX)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("SecretKey(<empty>)")
        } else {
            f.write_str("SecretKey([REDACTED])")
        }
    }
}

impl From<String> for SecretKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for SecretKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_requires_prefix() {
        assert!(SecretKey::new("sk_test_abc123").is_usable());
        assert!(!SecretKey::new("pk_test_abc123").is_usable());
        assert!(!SecretKey::default().is_usable());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = SecretKey::new("sk_live_super_secret");
        let debug_output = format!("{key:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret"));
    }

    #[test]
    fn test_debug_marks_empty_key() {
        assert_eq!(format!("{:?}", SecretKey::default()), "SecretKey(<empty>)");
    }
}
