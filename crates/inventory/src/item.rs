use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, Entity, ItemKey};

/// One row of the inventory table.
///
/// `item_name` keeps the spelling found in the table; all lookups go through
/// the normalized `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    item_name: String,
    key: ItemKey,
    quantity: u32,
    min_required: u32,
}

impl InventoryItem {
    pub fn new(item_name: impl Into<String>, quantity: u32, min_required: u32) -> DomainResult<Self> {
        let item_name = item_name.into();
        let key = ItemKey::new(&item_name);
        if key.is_empty() {
            return Err(DomainError::validation("item_name cannot be empty"));
        }
        Ok(Self {
            item_name,
            key,
            quantity,
            min_required,
        })
    }

    /// Build an item from signed table values, rejecting negatives.
    pub fn from_row(item_name: impl Into<String>, quantity: i64, min_required: i64) -> DomainResult<Self> {
        let item_name = item_name.into();
        let quantity = u32::try_from(quantity).map_err(|_| {
            DomainError::invariant(format!("quantity out of range for {item_name}: {quantity}"))
        })?;
        let min_required = u32::try_from(min_required).map_err(|_| {
            DomainError::invariant(format!("min_required out of range for {item_name}: {min_required}"))
        })?;
        Self::new(item_name, quantity, min_required)
    }

    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn min_required(&self) -> u32 {
        self.min_required
    }

    /// Whether the row can cover `requested` units.
    pub fn has_stock_for(&self, requested: u32) -> bool {
        self.quantity >= requested
    }

    /// Stock is below the configured minimum.
    pub fn is_short(&self) -> bool {
        self.quantity < self.min_required
    }

    /// Remove `quantity` units, flooring at zero. Returns the new quantity.
    pub fn deduct(&mut self, quantity: u32) -> u32 {
        self.quantity = self.quantity.saturating_sub(quantity);
        self.quantity
    }
}

impl Entity for InventoryItem {
    type Id = ItemKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}
