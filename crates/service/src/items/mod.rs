//! Items: the single resource managed by the service.

pub mod domain;
pub mod memory;
pub mod repository;

pub use domain::{parse_item_id, Item, ItemId, ItemInput};
pub use memory::MemoryItemStore;
pub use repository::ItemRepository;
