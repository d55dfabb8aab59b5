//! Resource identifiers
//!
//! Every entity (users, products) and the subject claim of access tokens
//! is keyed by an [`Identifier`]. The textual form is the canonical
//! lowercase hyphenated UUID, e.g. `67e55044-10b1-426f-9247-bb680e5fe0c8`.

use crate::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of the canonical hyphenated form
const CANONICAL_LEN: usize = 36;

/// Immutable, globally unique entity identifier
///
/// Ordering follows the underlying 128-bit value, which matches the
/// lexicographic ordering of the canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(Uuid);

impl Identifier {
    /// Generate a new random identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its canonical string form
    ///
    /// Only the lowercase hyphenated form produced by `to_string()` is
    /// accepted. Braced, URN, simple and uppercase variants are rejected.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        if text.len() != CANONICAL_LEN {
            return Err(IdentifierError::InvalidIdentifier(text.to_string()));
        }
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(IdentifierError::InvalidIdentifier(text.to_string()));
        }

        Uuid::try_parse(text)
            .map(Self)
            .map_err(|_| IdentifierError::InvalidIdentifier(text.to_string()))
    }

    /// Whether this is the all-zero identifier
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Access the underlying UUID
    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Identifier::generate();
        let b = Identifier::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_is_canonical() {
        let id = Identifier::generate();
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(text.matches('-').count(), 4);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            Identifier::parse(""),
            Err(IdentifierError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Identifier::parse("not-a-valid-id"),
            Err(IdentifierError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        let id = Identifier::generate();
        let uuid = id.as_uuid();

        assert!(Identifier::parse(&uuid.simple().to_string()).is_err());
        assert!(Identifier::parse(&uuid.braced().to_string()).is_err());
        assert!(Identifier::parse(&uuid.urn().to_string()).is_err());
        assert!(Identifier::parse(&id.to_string().to_uppercase()).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_hex_of_right_length() {
        assert!(Identifier::parse("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz").is_err());
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let id = Identifier::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));

        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<Identifier>("\"nope\"").is_err());
    }

    #[test]
    fn test_ordering_matches_string_ordering() {
        let mut ids: Vec<Identifier> = (0..20).map(|_| Identifier::generate()).collect();
        let mut texts: Vec<String> = ids.iter().map(ToString::to_string).collect();

        ids.sort();
        texts.sort();

        let sorted: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, texts);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any generated identifier survives a trip through its string form
        #[test]
        fn prop_parse_inverts_display(_seed in any::<u64>()) {
            let id = Identifier::generate();
            prop_assert_eq!(Identifier::parse(&id.to_string()).unwrap(), id);
        }

        /// Any 128-bit value in canonical form parses back to itself
        #[test]
        fn prop_canonical_form_round_trips(bits in any::<u128>()) {
            let id = Identifier(Uuid::from_u128(bits));
            let parsed: Identifier = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }

        /// Arbitrary short strings never parse
        #[test]
        fn prop_wrong_length_rejected(text in "[a-f0-9-]{0,35}") {
            prop_assert!(Identifier::parse(&text).is_err());
        }
    }
}
