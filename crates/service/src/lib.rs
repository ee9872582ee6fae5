//! Service layer for the item store.
//! - `items` holds the domain types, the repository seam and the in-memory table.
//! - `errors` is the error taxonomy shared with the HTTP layer.

pub mod errors;
pub mod items;
