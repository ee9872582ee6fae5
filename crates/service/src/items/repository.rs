use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::items::domain::{Item, ItemId, ItemInput};

/// Storage seam for items. The HTTP layer only talks to this trait.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Snapshot of every item, in no particular order.
    async fn list(&self) -> Vec<Item>;
    async fn get(&self, id: ItemId) -> Result<Item, ServiceError>;
    /// Allocates the next id; ids are never reused.
    async fn create(&self, input: ItemInput) -> Result<Item, ServiceError>;
    /// Full replacement keeping the original id.
    async fn update(&self, id: ItemId, input: ItemInput) -> Result<Item, ServiceError>;
    /// Fails with `NotFound` when the item is already gone.
    async fn delete(&self, id: ItemId) -> Result<(), ServiceError>;
}
