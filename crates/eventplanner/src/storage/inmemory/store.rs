//! In-memory store implementation.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use eventplanner_core::storage::{
    Attributes, ItemKey, KeyCondition, KeyValueStore, Record, Result, StoreError, WriteOp,
    MAX_TRANSACTION_ITEMS,
};

/// In-memory key-value store.
///
/// Cloning is cheap and every clone shares the same table. Data is lost when
/// the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<ItemKey, Attributes>>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently stored.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::ConnectionFailed("store is closed".to_string()));
        }
        Ok(())
    }
}

fn validate_transaction(ops: &[WriteOp]) -> Result<()> {
    if ops.len() > MAX_TRANSACTION_ITEMS {
        return Err(StoreError::TransactionTooLarge {
            count: ops.len(),
            max: MAX_TRANSACTION_ITEMS,
        });
    }

    let mut seen = HashSet::with_capacity(ops.len());
    for op in ops {
        let key = op.key();
        if !seen.insert(key) {
            return Err(StoreError::TransactionCanceled(format!(
                "multiple operations on item ({}, {})",
                key.partition, key.sort
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Record>> {
        self.ensure_open()?;
        let items = self.items.read().await;
        Ok(items
            .get(key)
            .map(|attributes| Record::new(key.clone(), attributes.clone())))
    }

    async fn put_item(&self, record: Record) -> Result<()> {
        self.ensure_open()?;
        let mut items = self.items.write().await;
        items.insert(record.key, record.attributes);
        Ok(())
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<()> {
        self.ensure_open()?;
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }

    async fn query(&self, condition: &KeyCondition) -> Result<Vec<Record>> {
        self.ensure_open()?;
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|(key, _)| condition.matches(key))
            .map(|(key, attributes)| Record::new(key.clone(), attributes.clone()))
            .collect())
    }

    async fn scan(&self, sort_key_prefix: &str) -> Result<Vec<Record>> {
        self.ensure_open()?;
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|(key, _)| key.sort.starts_with(sort_key_prefix))
            .map(|(key, attributes)| Record::new(key.clone(), attributes.clone()))
            .collect())
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.ensure_open()?;
        validate_transaction(&ops)?;

        let mut items = self.items.write().await;
        for op in ops {
            match op {
                WriteOp::Put(record) => {
                    items.insert(record.key, record.attributes);
                }
                WriteOp::Delete(key) => {
                    items.remove(&key);
                }
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        tracing::debug!("in-memory store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(partition: &str, sort: &str, name: &str) -> Record {
        let attributes = match json!({ "name": name }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Record::new(ItemKey::new(partition, sort), attributes)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::new();
        let item = record("e1", "EVENT-e1", "Reunion");

        store.put_item(item.clone()).await.unwrap();

        let retrieved = store.get_item(&item.key).await.unwrap();
        assert_eq!(retrieved, Some(item));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = InMemoryStore::new();
        let result = store.get_item(&ItemKey::new("e1", "EVENT-e1")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "TASK-t1", "Old")).await.unwrap();
        store.put_item(record("e1", "TASK-t1", "New")).await.unwrap();

        let retrieved = store
            .get_item(&ItemKey::new("e1", "TASK-t1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.attributes["name"], "New");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryStore::new();
        store.delete_item(&ItemKey::new("e1", "TASK-t1")).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_partition_with_prefix() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "EVENT-e1", "Event")).await.unwrap();
        store.put_item(record("e1", "GUEST-b", "B")).await.unwrap();
        store.put_item(record("e1", "GUEST-a", "A")).await.unwrap();
        store.put_item(record("e2", "GUEST-c", "C")).await.unwrap();

        let guests = store
            .query(&KeyCondition::PartitionWithPrefix {
                partition: "e1".to_string(),
                prefix: "GUEST-".to_string(),
            })
            .await
            .unwrap();

        let sorts: Vec<&str> = guests.iter().map(|r| r.key.sort.as_str()).collect();
        assert_eq!(sorts, vec!["GUEST-a", "GUEST-b"]);

        let partition = store
            .query(&KeyCondition::Partition("e1".to_string()))
            .await
            .unwrap();
        assert_eq!(partition.len(), 3);
    }

    #[tokio::test]
    async fn test_query_owner_index_spans_partitions() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "OWNER-ANA@X.COM", "1")).await.unwrap();
        store.put_item(record("e2", "OWNER-ANA@X.COM", "2")).await.unwrap();
        store.put_item(record("e2", "OWNER-BOB@X.COM", "3")).await.unwrap();

        let owned = store
            .query(&KeyCondition::OwnerIndex("OWNER-ANA@X.COM".to_string()))
            .await
            .unwrap();

        let partitions: Vec<&str> = owned.iter().map(|r| r.key.partition.as_str()).collect();
        assert_eq!(partitions, vec!["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_scan_by_sort_key_prefix() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "EVENT-e1", "1")).await.unwrap();
        store.put_item(record("e2", "EVENT-e2", "2")).await.unwrap();
        store.put_item(record("e2", "TASK-t1", "3")).await.unwrap();

        let events = store.scan("EVENT-").await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn test_transaction_applies_all() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "TASK-t1", "gone")).await.unwrap();

        store
            .transact_write(vec![
                WriteOp::Put(record("e1", "EVENT-e1", "Event")),
                WriteOp::Put(record("e1", "OWNER-ANA@X.COM", "Owner")),
                WriteOp::Delete(ItemKey::new("e1", "TASK-t1")),
            ])
            .await
            .unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store
            .get_item(&ItemKey::new("e1", "TASK-t1"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_transaction_too_large_applies_nothing() {
        let store = InMemoryStore::new();
        let ops: Vec<WriteOp> = (0..=MAX_TRANSACTION_ITEMS)
            .map(|i| WriteOp::Put(record("e1", &format!("TASK-{i}"), "t")))
            .collect();

        let result = store.transact_write(ops).await;

        assert_eq!(
            result,
            Err(StoreError::TransactionTooLarge {
                count: MAX_TRANSACTION_ITEMS + 1,
                max: MAX_TRANSACTION_ITEMS,
            })
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_transaction_rejects_duplicate_keys() {
        let store = InMemoryStore::new();
        let result = store
            .transact_write(vec![
                WriteOp::Put(record("e1", "TASK-t1", "a")),
                WriteOp::Delete(ItemKey::new("e1", "TASK-t1")),
            ])
            .await;

        assert!(matches!(result, Err(StoreError::TransactionCanceled(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_operations_fail_after_close() {
        let store = InMemoryStore::new();
        store.put_item(record("e1", "EVENT-e1", "1")).await.unwrap();

        store.close().await.unwrap();

        let get = store.get_item(&ItemKey::new("e1", "EVENT-e1")).await;
        assert!(matches!(get, Err(StoreError::ConnectionFailed(_))));
        let put = store.put_item(record("e1", "TASK-t1", "t")).await;
        assert!(matches!(put, Err(StoreError::ConnectionFailed(_))));
        let scan = store.scan("EVENT-").await;
        assert!(matches!(scan, Err(StoreError::ConnectionFailed(_))));
    }
}
