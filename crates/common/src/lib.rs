//! Shared building blocks for the item store crates.

pub mod types;
pub mod utils;
