//! Fixtures shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use eventplanner_core::event::{Event, EventOwner};
use eventplanner_core::storage::keys::{event_sort_key, owner_sort_key};
use eventplanner_core::storage::{
    ItemKey, KeyCondition, KeyValueStore, Record, Result, StoreError, WriteOp,
};

use crate::storage::InMemoryStore;

/// Writes an event record plus an owner record for `owner` directly.
pub(crate) async fn owned_event(store: &InMemoryStore, event_id: &str, owner: &str) -> Event {
    let event = Event::new("Fixture", "Somewhere", Utc::now() + Duration::days(7)).with_id(event_id);
    store
        .transact_write(vec![
            WriteOp::Put(
                Record::from_entity(ItemKey::new(event_id, event_sort_key(event_id)), &event)
                    .unwrap(),
            ),
            WriteOp::Put(
                Record::from_entity(
                    ItemKey::new(event_id, owner_sort_key(owner)),
                    &EventOwner::new(owner, &event),
                )
                .unwrap(),
            ),
        ])
        .await
        .unwrap();
    event
}

/// Store whose single-item puts start failing after a number of successes.
pub(crate) struct FailingStore {
    inner: InMemoryStore,
    remaining_puts: AtomicUsize,
}

impl FailingStore {
    pub(crate) fn new(inner: InMemoryStore, successful_puts: usize) -> Self {
        Self {
            inner,
            remaining_puts: AtomicUsize::new(successful_puts),
        }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Record>> {
        self.inner.get_item(key).await
    }

    async fn put_item(&self, record: Record) -> Result<()> {
        let allowed = self
            .remaining_puts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(StoreError::ConnectionFailed("injected failure".to_string()));
        }
        self.inner.put_item(record).await
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<()> {
        self.inner.delete_item(key).await
    }

    async fn query(&self, condition: &KeyCondition) -> Result<Vec<Record>> {
        self.inner.query(condition).await
    }

    async fn scan(&self, sort_key_prefix: &str) -> Result<Vec<Record>> {
        self.inner.scan(sort_key_prefix).await
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.inner.transact_write(ops).await
    }
}
