//! Account and group entities and their keys.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

macro_rules! opaque_key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a key, rejecting blank values
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::validation(concat!($label, " key must not be empty")));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_key!(
    /// Opaque unique key of an account
    AccountKey,
    "account"
);

opaque_key!(
    /// Opaque unique key of a group, in a key space disjoint from accounts
    GroupKey,
    "group"
);

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountKey,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Account {
    /// Create an account without an email address
    pub fn new(id: AccountKey, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Group of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountGroup {
    pub id: GroupKey,
    pub display_name: String,
}

impl AccountGroup {
    pub fn new(id: GroupKey, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_are_rejected() {
        assert!(AccountKey::new("").is_err());
        assert!(AccountKey::new("   ").is_err());
        assert!(GroupKey::new("").is_err());
        assert!(matches!(
            "".parse::<GroupKey>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_key_display_is_raw_value() {
        let key = AccountKey::new("42").unwrap();
        assert_eq!(key.to_string(), "42");
        assert_eq!(key.as_str(), "42");
    }

    #[test]
    fn test_keys_borrow_as_str() {
        let mut accounts = std::collections::HashSet::new();
        accounts.insert(AccountKey::new("100").unwrap());

        assert!(accounts.contains(GroupKey::new("100").unwrap().as_str()));
        assert!(!accounts.contains("ALL"));
    }

    #[test]
    fn test_account_builder_sets_email() {
        let account = Account::new(AccountKey::new("1").unwrap(), "Palmer Luckey")
            .with_email("palmer@example.com");
        assert_eq!(account.display_name, "Palmer Luckey");
        assert_eq!(account.email.as_deref(), Some("palmer@example.com"));
    }
}
