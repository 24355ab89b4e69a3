//! Catalog item identifiers.
//!
//! Items are addressed by a URL-safe slug (e.g. `sea-pickle-farm`) rather than
//! a numeric key, because the id travels through form fields and is shown in
//! markup.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ItemId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemIdError {
    /// The input string is empty.
    #[error("item id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("item id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("item id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Identifier of a catalog item.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - Only lowercase ASCII letters, digits and `-`
///
/// ## Examples
///
/// ```
/// use blockshop_core::ItemId;
///
/// assert!(ItemId::parse("krypton-client").is_ok());
///
/// assert!(ItemId::parse("").is_err());
/// assert!(ItemId::parse("Elytra").is_err());
/// assert!(ItemId::parse("a b").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Maximum length of an item id.
    pub const MAX_LENGTH: usize = 64;

    /// Parse an `ItemId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains characters other than `[a-z0-9-]`.
    pub fn parse(s: &str) -> Result<Self, ItemIdError> {
        if s.is_empty() {
            return Err(ItemIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ItemIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(ItemIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(ItemId::parse("elytra").is_ok());
        assert!(ItemId::parse("skeleton-spawner").is_ok());
        assert!(ItemId::parse("farm-150").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ItemId::parse(""), Err(ItemIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(65);
        assert!(matches!(
            ItemId::parse(&long),
            Err(ItemIdError::TooLong { max: 64 })
        ));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_spaces() {
        assert_eq!(
            ItemId::parse("Elytra"),
            Err(ItemIdError::InvalidCharacter('E'))
        );
        assert_eq!(
            ItemId::parse("sea pickle"),
            Err(ItemIdError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let id: ItemId = serde_json::from_str("\"elytra\"").unwrap();
        assert_eq!(id.as_str(), "elytra");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"elytra\"");

        assert!(serde_json::from_str::<ItemId>("\"../etc\"").is_err());
    }
}
