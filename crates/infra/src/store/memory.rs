use std::sync::RwLock;

use async_trait::async_trait;

use orderflow_core::ItemKey;
use orderflow_inventory::InventoryItem;
use orderflow_sales::DecisionRecord;
use orderflow_staff::StaffMember;

use super::{IntakeStore, ensure_unique_keys};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Tables {
    inventory: Vec<InventoryItem>,
    staff: Vec<StaffMember>,
    orders: Vec<DecisionRecord>,
}

/// In-memory store for tests/dev.
///
/// One lock guards all three tables, so `commit_acceptance` is atomic.
#[derive(Debug, Default)]
pub struct InMemoryIntakeStore {
    inner: RwLock<Tables>,
}

impl InMemoryIntakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with initial inventory and staff tables.
    pub fn seeded(inventory: Vec<InventoryItem>, staff: Vec<StaffMember>) -> Result<Self, StoreError> {
        ensure_unique_keys(&inventory)?;
        Ok(Self {
            inner: RwLock::new(Tables {
                inventory,
                staff,
                orders: Vec::new(),
            }),
        })
    }
}

#[async_trait]
impl IntakeStore for InMemoryIntakeStore {
    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.inventory.clone())
    }

    async fn get_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.inventory.iter().find(|i| i.key() == key).cloned())
    }

    async fn staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.staff.clone())
    }

    async fn orders(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        let tables = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.orders.clone())
    }

    async fn append_order(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        tables.orders.push(record.clone());
        Ok(())
    }

    async fn commit_acceptance(
        &self,
        item: &ItemKey,
        quantity: u32,
        staff_name: &str,
        record: &DecisionRecord,
    ) -> Result<u32, StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;

        // Locate both rows before touching either.
        let item_idx = tables
            .inventory
            .iter()
            .position(|i| i.key() == item)
            .ok_or_else(|| StoreError::ItemNotFound(item.clone()))?;
        let staff_idx = tables
            .staff
            .iter()
            .position(|m| m.has_name(staff_name) && m.can_handle(item))
            .ok_or_else(|| StoreError::StaffNotAvailable(staff_name.to_string()))?;

        let remaining = tables.inventory[item_idx].deduct(quantity);
        tables.staff[staff_idx].mark_unavailable();
        tables.orders.push(record.clone());

        Ok(remaining)
    }

    async fn replace_inventory(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        ensure_unique_keys(items)?;
        let mut tables = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        tables.inventory = items.to_vec();
        Ok(())
    }

    async fn replace_staff(&self, members: &[StaffMember]) -> Result<(), StoreError> {
        let mut tables = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        tables.staff = members.to_vec();
        Ok(())
    }
}
