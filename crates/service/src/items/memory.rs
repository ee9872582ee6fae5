use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::ServiceError;
use crate::items::domain::{Item, ItemId, ItemInput};
use crate::items::repository::ItemRepository;

struct ItemTable {
    items: HashMap<ItemId, Item>,
    next_id: ItemId,
}

/// In-memory item table guarded by a single mutex.
///
/// Every operation, reads included, holds the lock only for the map access
/// itself. Nothing survives a restart.
pub struct MemoryItemStore {
    inner: Mutex<ItemTable>,
}

impl MemoryItemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(ItemTable { items: HashMap::new(), next_id: 1 }),
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ItemRepository for MemoryItemStore {
    async fn list(&self) -> Vec<Item> {
        let table = self.inner.lock().await;
        table.items.values().cloned().collect()
    }

    async fn get(&self, id: ItemId) -> Result<Item, ServiceError> {
        let table = self.inner.lock().await;
        table.items.get(&id).cloned().ok_or_else(|| ServiceError::not_found("item", id))
    }

    async fn create(&self, input: ItemInput) -> Result<Item, ServiceError> {
        let mut table = self.inner.lock().await;
        let id = table.next_id;
        table.next_id += 1;
        let item = input.into_item(id);
        table.items.insert(id, item.clone());
        drop(table);
        debug!(id, "item created");
        Ok(item)
    }

    async fn update(&self, id: ItemId, input: ItemInput) -> Result<Item, ServiceError> {
        let mut table = self.inner.lock().await;
        let slot = table.items.get_mut(&id).ok_or_else(|| ServiceError::not_found("item", id))?;
        *slot = input.into_item(id);
        let updated = slot.clone();
        drop(table);
        debug!(id, "item updated");
        Ok(updated)
    }

    async fn delete(&self, id: ItemId) -> Result<(), ServiceError> {
        let mut table = self.inner.lock().await;
        let existed = table.items.remove(&id).is_some();
        drop(table);
        if !existed {
            return Err(ServiceError::not_found("item", id));
        }
        debug!(id, "item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn input(name: &str, description: &str) -> ItemInput {
        ItemInput { name: name.into(), description: description.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn memory_store_crud() -> Result<(), anyhow::Error> {
        let store = MemoryItemStore::new();
        assert!(store.is_empty().await);

        let a = store.create(input("A", "d1")).await?;
        let b = store.create(input("B", "d2")).await?;
        assert_eq!((a.id, b.id), (1, 2));

        let names: HashSet<String> = store.list().await.into_iter().map(|i| i.name).collect();
        assert_eq!(names, HashSet::from(["A".to_string(), "B".to_string()]));

        let found = store.get(a.id).await?;
        assert_eq!(found, Item { id: 1, name: "A".into(), description: "d1".into() });

        let updated = store.update(a.id, input("A2", "d1b")).await?;
        assert_eq!(updated, Item { id: 1, name: "A2".into(), description: "d1b".into() });
        assert_eq!(store.get(a.id).await?, updated);

        store.delete(b.id).await?;
        assert_eq!(store.get(b.id).await, Err(ServiceError::not_found("item", 2)));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() -> Result<(), anyhow::Error> {
        let store = MemoryItemStore::new();
        let first = store.create(input("x", "")).await?;
        store.delete(first.id).await?;
        let second = store.create(input("y", "")).await?;
        assert!(second.id > first.id);
        Ok(())
    }

    #[tokio::test]
    async fn delete_twice_reports_not_found() -> Result<(), anyhow::Error> {
        let store = MemoryItemStore::new();
        let item = store.create(input("x", "")).await?;
        store.delete(item.id).await?;
        assert!(matches!(store.delete(item.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_item_does_not_insert() {
        let store = MemoryItemStore::new();
        let res = store.update(5, input("ghost", "")).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn list_count_tracks_creates_minus_deletes() -> Result<(), anyhow::Error> {
        let store = MemoryItemStore::new();
        let mut ids = Vec::new();
        for n in 0..10 {
            ids.push(store.create(input(&format!("item-{n}"), "")).await?.id);
        }
        for id in ids.iter().take(4) {
            store.delete(*id).await?;
        }
        assert_eq!(store.list().await.len(), 6);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ids() {
        let store = MemoryItemStore::new();
        let mut handles = Vec::new();
        for n in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(input(&n.to_string(), "")).await.map(|i| i.id)
            }));
        }
        let mut ids = HashSet::new();
        for h in handles {
            let id = h.await.expect("join").expect("create");
            assert!(ids.insert(id), "duplicate id {id}");
        }
        assert_eq!(ids.len(), 64);
        assert_eq!(ids.iter().copied().max(), Some(64));
    }
}
