//! Strongly-typed product identifier.

use core::borrow::Borrow;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stable store identifier of a product, unique within the catalog.
///
/// Always non-empty and free of surrounding whitespace. Deserialization goes
/// through the same validation as [`FromStr`], so a snapshot or native payload
/// can never smuggle in an empty key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::invalid_sku("sku must not be empty"));
        }
        if value.trim() != value {
            return Err(DomainError::invalid_sku(format!(
                "sku must not carry surrounding whitespace: {value:?}"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Sku {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Sku {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Sku {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for Sku {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_sku() {
        let sku: Sku = "remove_ads".parse().unwrap();
        assert_eq!(sku.as_str(), "remove_ads");
        assert_eq!(sku, "remove_ads");
    }

    #[test]
    fn rejects_empty_and_padded() {
        assert!(matches!(Sku::new(""), Err(DomainError::InvalidSku(_))));
        assert!(matches!(Sku::new("   "), Err(DomainError::InvalidSku(_))));
        assert!(matches!(Sku::new(" gold "), Err(DomainError::InvalidSku(_))));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Sku = serde_json::from_str("\"gold_tier\"").unwrap();
        assert_eq!(ok.to_string(), "gold_tier");

        let err = serde_json::from_str::<Sku>("\"\"");
        assert!(err.is_err());
    }
}
