use async_trait::async_trait;

use super::{ItemKey, KeyCondition, Record, Result, WriteOp};

/// Outbound key-value store holding the single table.
///
/// Point operations are atomic on their own. `transact_write` applies every
/// operation or none of them. Nothing else is atomic: a read followed by a
/// write is two independent requests.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets an item by its full key.
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Record>>;

    /// Writes an item, replacing any item with the same key.
    async fn put_item(&self, record: Record) -> Result<()>;

    /// Deletes an item. Deleting a missing item is not an error.
    async fn delete_item(&self, key: &ItemKey) -> Result<()>;

    /// Returns every item matching `condition`, ordered by sort key within a
    /// partition.
    async fn query(&self, condition: &KeyCondition) -> Result<Vec<Record>>;

    /// Reads the whole table and keeps items whose sort key begins with
    /// `sort_key_prefix`. Cost grows with the table, not with the result.
    async fn scan(&self, sort_key_prefix: &str) -> Result<Vec<Record>>;

    /// Applies all operations atomically.
    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()>;

    /// Releases the store. Operations after close fail.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
