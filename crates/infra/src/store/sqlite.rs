//! SQLite-backed intake store.
//!
//! Table order is insertion order: `rowid` for inventory, the autoincrement
//! `position` for staff and `id` for the Order Log.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use orderflow_core::{Decision, ItemKey};
use orderflow_inventory::InventoryItem;
use orderflow_sales::{DecisionRecord, parse_timestamp};
use orderflow_staff::StaffMember;

use super::{IntakeStore, ensure_unique_keys};
use crate::error::StoreError;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        item_key     TEXT PRIMARY KEY,
        item_name    TEXT NOT NULL,
        quantity     INTEGER NOT NULL,
        min_required INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS staff (
        position   INTEGER PRIMARY KEY AUTOINCREMENT,
        staff_name TEXT NOT NULL,
        skill      TEXT NOT NULL,
        available  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp      TEXT NOT NULL,
        customer_name  TEXT NOT NULL,
        customer_email TEXT NOT NULL,
        customer_phone TEXT NOT NULL DEFAULT '',
        item_name      TEXT NOT NULL,
        quantity       INTEGER NOT NULL,
        decision       TEXT NOT NULL,
        assigned_staff TEXT NOT NULL DEFAULT ''
    )
    "#,
];

#[derive(Debug, Clone)]
pub struct SqliteIntakeStore {
    pool: SqlitePool,
}

impl SqliteIntakeStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::db("parse_url"))?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if is_memory_url(url) {
            // Each connection to :memory: is its own database; keep exactly one alive.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::db("connect"))?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. Used by tests.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::db("migrate"))?;
        }
        tracing::debug!("sqlite schema ensured");
        Ok(())
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn item_from_row(row: &SqliteRow) -> Result<InventoryItem, StoreError> {
    let item_name: String = row.try_get("item_name").map_err(StoreError::db("read_inventory"))?;
    let quantity: i64 = row.try_get("quantity").map_err(StoreError::db("read_inventory"))?;
    let min_required: i64 = row.try_get("min_required").map_err(StoreError::db("read_inventory"))?;
    Ok(InventoryItem::from_row(item_name, quantity, min_required)?)
}

fn member_from_row(row: &SqliteRow) -> Result<StaffMember, StoreError> {
    let name: String = row.try_get("staff_name").map_err(StoreError::db("read_staff"))?;
    let skill: String = row.try_get("skill").map_err(StoreError::db("read_staff"))?;
    let available: String = row.try_get("available").map_err(StoreError::db("read_staff"))?;
    Ok(StaffMember::from_row(&name, &skill, &available)?)
}

fn record_from_row(row: &SqliteRow) -> Result<DecisionRecord, StoreError> {
    let get = |col: &'static str| -> Result<String, StoreError> {
        row.try_get(col).map_err(StoreError::db("read_orders"))
    };

    let quantity: i64 = row.try_get("quantity").map_err(StoreError::db("read_orders"))?;
    let quantity = u32::try_from(quantity)
        .map_err(|_| StoreError::Corrupt(format!("order quantity out of range: {quantity}")))?;

    let decision = get("decision")?;
    let decision = Decision::from_str(&decision)?;

    Ok(DecisionRecord {
        timestamp: parse_timestamp(&get("timestamp")?)?,
        customer_name: get("customer_name")?,
        customer_email: get("customer_email")?,
        customer_phone: get("customer_phone")?,
        item_name: get("item_name")?,
        quantity,
        decision,
        assigned_staff: get("assigned_staff")?,
    })
}

async fn insert_order<'e, E>(executor: E, record: &DecisionRecord) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO orders
            (timestamp, customer_name, customer_email, customer_phone,
             item_name, quantity, decision, assigned_staff)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.formatted_timestamp())
    .bind(&record.customer_name)
    .bind(&record.customer_email)
    .bind(&record.customer_phone)
    .bind(&record.item_name)
    .bind(i64::from(record.quantity))
    .bind(record.decision.as_str())
    .bind(&record.assigned_staff)
    .execute(executor)
    .await
    .map_err(StoreError::db("insert_order"))?;
    Ok(())
}

#[async_trait]
impl IntakeStore for SqliteIntakeStore {
    async fn inventory(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = sqlx::query(
            "SELECT item_name, quantity, min_required FROM inventory ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::db("load_inventory"))?;

        rows.iter().map(item_from_row).collect()
    }

    async fn get_item(&self, key: &ItemKey) -> Result<Option<InventoryItem>, StoreError> {
        let row = sqlx::query(
            "SELECT item_name, quantity, min_required FROM inventory WHERE item_key = ?",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::db("get_item"))?;

        row.as_ref().map(item_from_row).transpose()
    }

    async fn staff(&self) -> Result<Vec<StaffMember>, StoreError> {
        let rows = sqlx::query("SELECT staff_name, skill, available FROM staff ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::db("load_staff"))?;

        rows.iter().map(member_from_row).collect()
    }

    async fn orders(&self) -> Result<Vec<DecisionRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT timestamp, customer_name, customer_email, customer_phone,
                   item_name, quantity, decision, assigned_staff
            FROM orders
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::db("load_orders"))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn append_order(&self, record: &DecisionRecord) -> Result<(), StoreError> {
        insert_order(&self.pool, record).await
    }

    async fn commit_acceptance(
        &self,
        item: &ItemKey,
        quantity: u32,
        staff_name: &str,
        record: &DecisionRecord,
    ) -> Result<u32, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::db("begin_transaction"))?;

        let row = sqlx::query("SELECT quantity FROM inventory WHERE item_key = ?")
            .bind(item.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(StoreError::db("select_item"))?
            .ok_or_else(|| StoreError::ItemNotFound(item.clone()))?;
        let current: i64 = row.try_get("quantity").map_err(StoreError::db("select_item"))?;
        let remaining = (current - i64::from(quantity)).max(0);

        let staff_rows = sqlx::query("SELECT position, staff_name, skill, available FROM staff ORDER BY position")
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::db("select_staff"))?;

        let mut claimed = None;
        for row in &staff_rows {
            let member = member_from_row(row)?;
            if member.has_name(staff_name) && member.can_handle(item) {
                let position: i64 = row.try_get("position").map_err(StoreError::db("select_staff"))?;
                claimed = Some(position);
                break;
            }
        }
        let position = claimed.ok_or_else(|| StoreError::StaffNotAvailable(staff_name.to_string()))?;

        sqlx::query("UPDATE inventory SET quantity = ? WHERE item_key = ?")
            .bind(remaining)
            .bind(item.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::db("deduct_inventory"))?;

        sqlx::query("UPDATE staff SET available = 'no' WHERE position = ?")
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::db("claim_staff"))?;

        insert_order(&mut *tx, record).await?;

        tx.commit()
            .await
            .map_err(StoreError::db("commit_transaction"))?;

        u32::try_from(remaining)
            .map_err(|_| StoreError::Corrupt(format!("inventory quantity out of range: {remaining}")))
    }

    async fn replace_inventory(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        ensure_unique_keys(items)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::db("begin_transaction"))?;

        sqlx::query("DELETE FROM inventory")
            .execute(&mut *tx)
            .await
            .map_err(StoreError::db("clear_inventory"))?;

        for item in items {
            sqlx::query(
                "INSERT INTO inventory (item_key, item_name, quantity, min_required) VALUES (?, ?, ?, ?)",
            )
            .bind(item.key().as_str())
            .bind(item.item_name())
            .bind(i64::from(item.quantity()))
            .bind(i64::from(item.min_required()))
            .execute(&mut *tx)
            .await
            .map_err(StoreError::db("insert_inventory"))?;
        }

        tx.commit()
            .await
            .map_err(StoreError::db("commit_transaction"))?;
        Ok(())
    }

    async fn replace_staff(&self, members: &[StaffMember]) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(StoreError::db("begin_transaction"))?;

        sqlx::query("DELETE FROM staff")
            .execute(&mut *tx)
            .await
            .map_err(StoreError::db("clear_staff"))?;

        for member in members {
            sqlx::query("INSERT INTO staff (staff_name, skill, available) VALUES (?, ?, ?)")
                .bind(member.name())
                .bind(member.skill().as_str())
                .bind(member.availability().as_str())
                .execute(&mut *tx)
                .await
                .map_err(StoreError::db("insert_staff"))?;
        }

        tx.commit()
            .await
            .map_err(StoreError::db("commit_transaction"))?;
        Ok(())
    }
}
