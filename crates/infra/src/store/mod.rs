//! Persistence for the three logical tables: inventory, staff, Order Log.
//!
//! Reads return full snapshots in table order. Writes are narrow, atomic
//! operations instead of whole-table rewrites.

use std::sync::Arc;

use async_trait::async_trait;

use orderflow_core::ItemKey;
use orderflow_inventory::InventoryItem;
use orderflow_sales::DecisionRecord;
use orderflow_staff::StaffMember;

use crate::error::StoreError;

pub mod memory;
pub mod seed;
pub mod sqlite;

pub use memory::InMemoryIntakeStore;
pub use seed::{SeedData, seed_if_empty};
pub use sqlite::SqliteIntakeStore;

#[async_trait]
pub trait IntakeStore: Send + Sync + 'static {
    /// Inventory snapshot in table order.
    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreError>;

    async fn get_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>, StoreError>;

    /// Staff snapshot in table order.
    async fn staff(&self) -> Result<Vec<StaffMember>, StoreError>;

    /// Full Order Log, oldest first.
    async fn orders(&self) -> Result<Vec<DecisionRecord>, StoreError>;

    async fn append_order(&self, record: &DecisionRecord) -> Result<(), StoreError>;

    /// Apply an accepted order as one unit, in this order:
    /// deduct `quantity` from `item` (floored at 0), mark the first available
    /// member named `staff_name` whose skill is `item` unavailable, append
    /// `record`.
    ///
    /// If the item is gone or the member is no longer available nothing is
    /// written. Returns the remaining quantity.
    async fn commit_acceptance(
        &self,
        item: &ItemKey,
        quantity: u32,
        staff_name: &str,
        record: &DecisionRecord,
    ) -> Result<u32, StoreError>;

    /// Overwrite the inventory table. Item keys must be unique.
    async fn replace_inventory(&self, items: &[InventoryItem]) -> Result<(), StoreError>;

    /// Overwrite the staff table, keeping the given order.
    async fn replace_staff(&self, members: &[StaffMember]) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> IntakeStore for Arc<S>
where
    S: IntakeStore + ?Sized,
{
    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).inventory().await
    }

    async fn get_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>, StoreError> {
        (**self).get_item(key).await
    }

    async fn staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        (**self).staff().await
    }

    async fn orders(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        (**self).orders().await
    }

    async fn append_order(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        (**self).append_order(record).await
    }

    async fn commit_acceptance(
        &self,
        item: &ItemKey,
        quantity: u32,
        staff_name: &str,
        record: &DecisionRecord,
    ) -> Result<u32, StoreError> {
        (**self).commit_acceptance(item, quantity, staff_name, record).await
    }

    async fn replace_inventory(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        (**self).replace_inventory(items).await
    }

    async fn replace_staff(&self, members: &[StaffMember]) -> Result<(), StoreError> {
        (**self).replace_staff(members).await
    }
}

/// Reject inventory snapshots with colliding normalized keys.
pub(crate) fn ensure_unique_keys(items: &[InventoryItem]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(StoreError::DuplicateItem(item.key().clone()));
        }
    }
    Ok(())
}
