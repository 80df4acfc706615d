//! Port implementations that need no database.
//!
//! `MemoryClaimStore` and `MemoryConfigStore` back tests and the `memory`
//! store mode; `FileConfigStore` keeps the configuration document on disk.

mod file;
mod memory;

pub use file::FileConfigStore;
pub use memory::{MemoryClaimStore, MemoryConfigStore};
