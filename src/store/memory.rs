use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult};
use crate::models::{validate_text, Item, NewItem};

#[derive(Debug, Default)]
struct MemoryState {
    items: HashMap<Uuid, StoredItem>,
    next_sequence: u64,
}

#[derive(Debug, Clone)]
struct StoredItem {
    sequence: u64,
    item: Item,
}

/// Process-local item store.
///
/// All access goes through one `RwLock`, so each write observes and replaces
/// a record atomically. Insertion order is kept with a sequence number since
/// timestamps can collide.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    state: RwLock<MemoryState>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn create(&self, owner_id: Uuid, text: &str) -> StoreResult<Item> {
        let new_item = NewItem::new(owner_id, text);
        new_item.validate()?;

        let item = Item::from_new(new_item);
        let mut state = self.state.write();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.items.insert(
            item.item_id,
            StoredItem {
                sequence,
                item: item.clone(),
            },
        );

        debug!(item_id = %item.item_id, owner_id = %owner_id, "Stored new item in memory");
        Ok(item)
    }

    async fn find(&self, item_id: Uuid) -> StoreResult<Option<Item>> {
        Ok(self
            .state
            .read()
            .items
            .get(&item_id)
            .map(|stored| stored.item.clone()))
    }

    async fn update(&self, item_id: Uuid, text: &str) -> StoreResult<Item> {
        validate_text(text)?;

        let mut state = self.state.write();
        let stored = state
            .items
            .get_mut(&item_id)
            .ok_or(StoreError::NotFound(item_id))?;
        stored.item.text = text.to_string();
        stored.item.updated_at = chrono::Utc::now().naive_utc();

        Ok(stored.item.clone())
    }

    async fn delete(&self, item_id: Uuid) -> StoreResult<()> {
        self.state
            .write()
            .items
            .remove(&item_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(item_id))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Item>> {
        let state = self.state.read();
        let mut owned: Vec<&StoredItem> = state
            .items
            .values()
            .filter(|stored| stored.item.owner_id == owner_id)
            .collect();
        owned.sort_by_key(|stored| stored.sequence);

        Ok(owned.into_iter().map(|stored| stored.item.clone()).collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.state.read().items.len() as u64)
    }
}
