//! Initial table contents loaded from a JSON file at startup.

use std::path::Path;

use serde::Deserialize;

use orderflow_inventory::InventoryItem;
use orderflow_staff::StaffMember;

use super::{IntakeStore, ensure_unique_keys};
use crate::error::StoreError;

#[derive(Debug, Clone, Deserialize)]
pub struct InventorySeedRow {
    pub item_name: String,
    pub quantity: i64,
    pub min_required: i64,
}

/// `available` may be written as a JSON bool or as a `"yes"`/`"no"` cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AvailableCell {
    Flag(bool),
    Text(String),
}

impl AvailableCell {
    fn as_cell(&self) -> &str {
        match self {
            AvailableCell::Flag(true) => "yes",
            AvailableCell::Flag(false) => "no",
            AvailableCell::Text(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaffSeedRow {
    pub staff_name: String,
    pub skill: String,
    pub available: AvailableCell,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub inventory: Vec<InventorySeedRow>,
    #[serde(default)]
    pub staff: Vec<StaffSeedRow>,
}

impl SeedData {
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|e| StoreError::Seed(e.to_string()))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&raw)
    }

    pub fn inventory_items(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.inventory
            .iter()
            .map(|row| {
                InventoryItem::from_row(row.item_name.as_str(), row.quantity, row.min_required)
                    .map_err(|e| StoreError::Seed(format!("inventory row {:?}: {e}", row.item_name)))
            })
            .collect()
    }

    pub fn staff_members(&self) -> Result<Vec<StaffMember>, StoreError> {
        self.staff
            .iter()
            .map(|row| {
                StaffMember::from_row(&row.staff_name, &row.skill, row.available.as_cell())
                    .map_err(|e| StoreError::Seed(format!("staff row {:?}: {e}", row.staff_name)))
            })
            .collect()
    }
}

/// Write `seed` into `store` if the inventory table is empty.
///
/// Returns whether anything was written. Rows are validated before either
/// table is touched. Staff is written before inventory so that a failed
/// seed leaves inventory empty and the next start seeds again.
pub async fn seed_if_empty<S>(store: &S, seed: &SeedData) -> Result<bool, StoreError>
where
    S: IntakeStore + ?Sized,
{
    if !store.inventory().await?.is_empty() {
        tracing::info!("inventory already populated; skipping seed");
        return Ok(false);
    }

    let items = seed.inventory_items()?;
    ensure_unique_keys(&items)?;
    let members = seed.staff_members()?;

    store.replace_staff(&members).await?;
    store.replace_inventory(&items).await?;

    tracing::info!(
        inventory = items.len(),
        staff = members.len(),
        "seeded intake store"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryIntakeStore;
    use async_trait::async_trait;
    use orderflow_core::ItemKey;
    use orderflow_sales::DecisionRecord;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Fails the first `replace_staff` call, then behaves normally.
    struct FlakyStaffStore {
        inner: InMemoryIntakeStore,
        failed: AtomicBool,
    }

    #[async_trait]
    impl IntakeStore for FlakyStaffStore {
        async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
            self.inner.inventory().await
        }

        async fn get_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>, StoreError> {
            self.inner.get_item(key).await
        }

        async fn staff(&self) -> Result<Vec<StaffMember>, StoreError> {
            self.inner.staff().await
        }

        async fn orders(&self) -> Result<Vec<DecisionRecord>, StoreError> {
            self.inner.orders().await
        }

        async fn append_order(&self, record: &DecisionRecord) -> Result<(), StoreError> {
            self.inner.append_order(record).await
        }

        async fn commit_acceptance(
            &self,
            item: &ItemKey,
            quantity: u32,
            staff_name: &str,
            record: &DecisionRecord,
        ) -> Result<u32, StoreError> {
            self.inner.commit_acceptance(item, quantity, staff_name, record).await
        }

        async fn replace_inventory(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
            self.inner.replace_inventory(items).await
        }

        async fn replace_staff(&self, members: &[StaffMember]) -> Result<(), StoreError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StoreError::Corrupt("disk full".to_string()));
            }
            self.inner.replace_staff(members).await
        }
    }

    const SEED: &str = r#"{
        "inventory": [
            {"item_name": "Bolt", "quantity": 5, "min_required": 2},
            {"item_name": "Nut", "quantity": 1, "min_required": 3}
        ],
        "staff": [
            {"staff_name": "Alice", "skill": "bolt", "available": "Yes "},
            {"staff_name": "Bob", "skill": "nut", "available": false},
            {"staff_name": "Cara", "skill": "nut", "available": "maybe"}
        ]
    }"#;

    #[test]
    fn availability_accepts_bool_and_text_cells() {
        let seed = SeedData::from_json(SEED).unwrap();
        let staff = seed.staff_members().unwrap();
        assert!(staff[0].is_available());
        assert!(!staff[1].is_available());
        assert!(!staff[2].is_available());
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let seed = SeedData::from_json(
            r#"{"inventory": [{"item_name": "Bolt", "quantity": -1, "min_required": 0}]}"#,
        )
        .unwrap();
        assert!(matches!(seed.inventory_items(), Err(StoreError::Seed(_))));
    }

    #[test]
    fn malformed_json_is_a_seed_error() {
        assert!(matches!(SeedData::from_json("{"), Err(StoreError::Seed(_))));
    }

    #[tokio::test]
    async fn seeds_only_an_empty_store() {
        let store = InMemoryIntakeStore::new();
        let seed = SeedData::from_json(SEED).unwrap();

        assert!(seed_if_empty(&store, &seed).await.unwrap());
        assert_eq!(store.inventory().await.unwrap().len(), 2);
        assert_eq!(store.staff().await.unwrap().len(), 3);

        assert!(!seed_if_empty(&store, &seed).await.unwrap());
    }

    #[tokio::test]
    async fn load_reports_missing_file_as_io() {
        let err = SeedData::load("/nonexistent/orderflow-seed.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn failed_staff_write_leaves_store_seedable() {
        let store = FlakyStaffStore {
            inner: InMemoryIntakeStore::new(),
            failed: AtomicBool::new(false),
        };
        let seed = SeedData::from_json(SEED).unwrap();

        assert!(seed_if_empty(&store, &seed).await.is_err());
        assert!(store.inventory().await.unwrap().is_empty());

        assert!(seed_if_empty(&store, &seed).await.unwrap());
        assert_eq!(store.inventory().await.unwrap().len(), 2);
        assert_eq!(store.staff().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn duplicate_seed_items_write_nothing() {
        let store = InMemoryIntakeStore::new();
        let seed = SeedData::from_json(
            r#"{
                "inventory": [
                    {"item_name": "Bolt", "quantity": 1, "min_required": 0},
                    {"item_name": "bolt ", "quantity": 2, "min_required": 0}
                ],
                "staff": [{"staff_name": "Alice", "skill": "bolt", "available": true}]
            }"#,
        )
        .unwrap();

        let err = seed_if_empty(&store, &seed).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateItem(_)));
        assert!(store.staff().await.unwrap().is_empty());
    }
}
