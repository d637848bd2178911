//! Opaque identifiers issued by external collaborators

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Hex SHA-256 of the id, safe to use as a file name whatever the id contains
            pub fn storage_key(&self) -> String {
                hex::encode(Sha256::digest(self.0.as_bytes()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

opaque_id!(
    /// User identifier issued by the identity provider. Never interpreted.
    UserId
);

opaque_id!(
    /// Book identifier owned by the catalog. Never checked for existence.
    BookId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_is_path_safe() {
        let user = UserId::new("../../etc/passwd");
        let key = user.storage_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let book = BookId::new("three-body");
        assert_eq!(serde_json::to_string(&book).unwrap(), "\"three-body\"");
    }
}
