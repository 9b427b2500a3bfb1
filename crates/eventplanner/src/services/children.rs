//! Shared storage plumbing for items that live under an event: guests, tasks
//! and expense categories.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use eventplanner_core::event::{ExpenseCategory, Guest, Task};
use eventplanner_core::service::Result;
use eventplanner_core::storage::{
    ItemKey, ItemKind, KeyCondition, KeyValueStore, Record, SortKeyMode,
};

/// An entity stored as a child item of an event partition.
pub(crate) trait ChildEntity: Serialize + DeserializeOwned + Send + Sync {
    const KIND: ItemKind;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn time_created_on(&self) -> Option<DateTime<Utc>>;
    fn set_timestamps(&mut self, created: DateTime<Utc>, updated: DateTime<Utc>);
}

macro_rules! impl_child_entity {
    ($ty:ty, $kind:expr) => {
        impl ChildEntity for $ty {
            const KIND: ItemKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn time_created_on(&self) -> Option<DateTime<Utc>> {
                self.time_created_on
            }

            fn set_timestamps(&mut self, created: DateTime<Utc>, updated: DateTime<Utc>) {
                self.time_created_on = Some(created);
                self.time_updated_on = Some(updated);
            }
        }
    };
}

impl_child_entity!(Guest, ItemKind::Guest);
impl_child_entity!(Task, ItemKind::Task);
impl_child_entity!(ExpenseCategory, ItemKind::ExpenseCategory);

/// Reads and writes one kind of child item, applying the configured
/// [`SortKeyMode`].
#[derive(Clone)]
pub(crate) struct ChildItems {
    store: Arc<dyn KeyValueStore>,
    mode: SortKeyMode,
}

impl ChildItems {
    pub(crate) fn new(store: Arc<dyn KeyValueStore>, mode: SortKeyMode) -> Self {
        Self { store, mode }
    }

    /// Decodes a record, taking the id from its sort key.
    fn decode<T: ChildEntity>(&self, record: &Record) -> Result<T> {
        let mut entity: T = record.to_entity()?;
        entity.set_id(self.mode.decode_id(T::KIND, &record.key.sort));
        Ok(entity)
    }

    pub(crate) async fn get<T: ChildEntity>(&self, event_id: &str, id: &str) -> Result<Option<T>> {
        let key = ItemKey::new(event_id, self.mode.lookup_key(T::KIND, id));
        match self.store.get_item(&key).await? {
            Some(record) => Ok(Some(self.decode(&record)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn list<T: ChildEntity>(&self, event_id: &str) -> Result<Vec<T>> {
        let records = self
            .store
            .query(&KeyCondition::PartitionWithPrefix {
                partition: event_id.to_string(),
                prefix: T::KIND.prefix().to_string(),
            })
            .await?;

        records.iter().map(|record| self.decode(record)).collect()
    }

    /// Writes `entity`, which must already carry an id.
    ///
    /// The prior value is read to carry over its creation time. The read and
    /// the write are separate requests, so concurrent writers of the same id
    /// race and the last write wins.
    pub(crate) async fn put<T: ChildEntity>(&self, event_id: &str, mut entity: T) -> Result<T> {
        let id = entity.id().to_string();
        let existing: Option<T> = self.get(event_id, &id).await?;
        let now = Utc::now();
        let created = existing
            .as_ref()
            .and_then(|prior| prior.time_created_on())
            .unwrap_or(now);
        entity.set_timestamps(created, now);

        let sort = self.mode.write_key(T::KIND, &id, existing.is_some());
        let record = Record::from_entity(ItemKey::new(event_id, sort.clone()), &entity)?;
        self.store.put_item(record).await?;

        tracing::debug!(
            event_id,
            kind = %T::KIND,
            sort_key = %sort,
            updated = existing.is_some(),
            "stored child item"
        );

        // Legacy callers get back the id they sent.
        if self.mode == SortKeyMode::Prefixed {
            entity.set_id(self.mode.decode_id(T::KIND, &sort));
        }
        Ok(entity)
    }

    pub(crate) async fn delete<T: ChildEntity>(&self, event_id: &str, id: &str) -> Result<()> {
        let key = ItemKey::new(event_id, self.mode.lookup_key(T::KIND, id));
        self.store.delete_item(&key).await?;
        tracing::debug!(event_id, kind = %T::KIND, sort_key = %key.sort, "deleted child item");
        Ok(())
    }
}
