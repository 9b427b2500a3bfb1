//! In-memory storage backend.
//!
//! Keeps every item in one ordered map keyed by (partition, sort key) behind a
//! `tokio::sync::RwLock`. Useful for tests and local runs where persistence is
//! not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventplanner::storage::inmemory::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! // Hand the store to the services...
//! ```

mod store;

pub use store::InMemoryStore;
