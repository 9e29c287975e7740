//! # Item Store
//!
//! Persistence boundary for items. The access controller only talks to the
//! [`ItemStore`] trait; two backends implement it:
//!
//! - [`MemoryItemStore`] - process-local map, default backend and test backend
//! - [`PgItemStore`] - PostgreSQL via SQLx
//!
//! Both run [`validate_text`](crate::models::validate_text) before any write,
//! and neither offers a way to change an item's owner.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Item, ItemValidationError};

pub use memory::MemoryItemStore;
pub use postgres::PgItemStore;

/// Item store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid item: {0}")]
    Validation(#[from] ItemValidationError),

    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD operations over persisted items.
///
/// Single-record writes are atomic. `update` and `delete` report
/// [`StoreError::NotFound`] when the id is unknown; `find` returns `None`.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item owned by `owner_id`
    async fn create(&self, owner_id: Uuid, text: &str) -> StoreResult<Item>;

    async fn find(&self, item_id: Uuid) -> StoreResult<Option<Item>>;

    /// Replace the text of an existing item, returning the updated record
    async fn update(&self, item_id: Uuid, text: &str) -> StoreResult<Item>;

    async fn delete(&self, item_id: Uuid) -> StoreResult<()>;

    /// Items owned by `owner_id`, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Item>>;

    /// Total number of items across all owners
    async fn count(&self) -> StoreResult<u64>;
}
