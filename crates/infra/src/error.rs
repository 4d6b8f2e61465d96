use thiserror::Error;

use orderflow_core::{DomainError, ItemKey};

/// Persistence failure. Any of these aborts the current request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error during {op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed data: {0}")]
    Seed(String),

    #[error("duplicate inventory item: {0}")]
    DuplicateItem(ItemKey),

    #[error("inventory item not found: {0}")]
    ItemNotFound(ItemKey),

    #[error("no available staff member named {0}")]
    StaffNotAvailable(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn db(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Database { op, source }
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}
