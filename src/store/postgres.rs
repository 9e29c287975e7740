//! PostgreSQL item store.
//!
//! Queries are checked at runtime, so building the crate never needs a live
//! database. The tests at the bottom of this file do: they run under
//! `--features test-database` with `DATABASE_URL` pointing at a server where
//! `#[sqlx::test]` may create scratch databases.

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::models::{validate_text, Item, NewItem};

/// Embedded schema migrations from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const ITEM_COLUMNS: &str = "item_id, owner_id, text, created_at, updated_at";

/// PostgreSQL-backed item store
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool using the store configuration
    pub async fn connect(config: &StoreConfig, database_url: &str) -> StoreResult<Self> {
        debug!(
            max_connections = config.max_connections,
            acquire_timeout = config.acquire_timeout_seconds,
            "Creating item store database pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> StoreResult<()> {
        MIGRATOR.run(&self.pool).await?;
        info!("Item store migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn create(&self, owner_id: Uuid, text: &str) -> StoreResult<Item> {
        let new_item = NewItem::new(owner_id, text);
        new_item.validate()?;
        let item = Item::from_new(new_item);

        let sql = format!(
            "INSERT INTO items ({ITEM_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Item>(&sql)
            .bind(item.item_id)
            .bind(item.owner_id)
            .bind(&item.text)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find(&self, item_id: Uuid) -> StoreResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE item_id = $1");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn update(&self, item_id: Uuid, text: &str) -> StoreResult<Item> {
        validate_text(text)?;

        let sql = format!(
            "UPDATE items
            SET text = $2, updated_at = $3
            WHERE item_id = $1
            RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&sql)
            .bind(item_id)
            .bind(text)
            .bind(chrono::Utc::now().naive_utc())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(item_id))
    }

    async fn delete(&self, item_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(item_id));
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Item>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS}
            FROM items
            WHERE owner_id = $1
            ORDER BY created_at, item_id"
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn count(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}
