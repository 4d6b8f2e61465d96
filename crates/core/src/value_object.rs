//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Normalized item key (trimmed, lowercased).
///
/// Inventory item names and staff skills are both compared through this key,
/// so `"  Bolt "` and `"bolt"` address the same inventory row and match the
/// same skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(String);

impl ItemKey {
    /// Normalize a raw item name or skill into a key.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ValueObject for ItemKey {}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemKey {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_trimmed_and_lowercased() {
        assert_eq!(ItemKey::new("  Bolt \t").as_str(), "bolt");
        assert_eq!(ItemKey::new("BOLT"), ItemKey::new("bolt"));
    }

    #[test]
    fn inner_whitespace_is_kept() {
        assert_eq!(ItemKey::new(" Hex Nut ").as_str(), "hex nut");
        assert_ne!(ItemKey::new("hex nut"), ItemKey::new("hexnut"));
    }

    #[test]
    fn blank_input_yields_empty_key() {
        assert!(ItemKey::new("   ").is_empty());
    }

    #[test]
    fn deserialization_does_not_renormalize() {
        // Keys are persisted already normalized; serde stays transparent.
        let key: ItemKey = serde_json::from_str("\"bolt\"").unwrap();
        assert_eq!(key, ItemKey::new("bolt"));
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"bolt\"");
    }
}
