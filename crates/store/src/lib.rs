//! `billing-store`
//!
//! **Responsibility:** the persistent key-value slot the billing client keeps
//! its catalog snapshot in.
//!
//! Only get/set/remove of string values is assumed; engines are swappable.

pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite;
pub mod store;

pub use memory::InMemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::{SqliteStore, default_db_path};
pub use store::{KeyValueStore, StoreError};
