use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use eventplanner_core::event::{
    generate_random_id, normalize_shared_emails, validate_event, Event, EventOwner,
    EventSharedEmails, EventSummary,
};
use eventplanner_core::service::{
    AuthorizationService, EventFilter, EventService, Result, ServiceError,
};
use eventplanner_core::storage::keys::{event_sort_key, owner_email, owner_sort_key};
use eventplanner_core::storage::{
    ItemKey, ItemKind, KeyCondition, KeyValueStore, Record, WriteOp,
};

/// Event service over the single-table store.
#[derive(Clone)]
pub struct StoreEventService {
    store: Arc<dyn KeyValueStore>,
    authorization: Arc<dyn AuthorizationService>,
}

impl StoreEventService {
    pub fn new(store: Arc<dyn KeyValueStore>, authorization: Arc<dyn AuthorizationService>) -> Self {
        Self {
            store,
            authorization,
        }
    }

    async fn require_owner(&self, event_manager: &str, event_id: &str) -> Result<()> {
        if self.authorization.authorize(event_manager, event_id).await {
            Ok(())
        } else {
            tracing::warn!(event_id, user = event_manager, "unauthorized event access");
            Err(ServiceError::Unauthorized)
        }
    }

    fn owner_record(event_id: &str, email: &str, event: &Event) -> Result<Record> {
        let owner = EventOwner::new(email, event);
        let key = ItemKey::new(event_id, owner_sort_key(email));
        Ok(Record::from_entity(key, &owner)?)
    }
}

/// Decodes an event record. The id always comes from the partition key.
fn decode_event(record: &Record) -> Result<Event> {
    let mut event: Event = record.to_entity()?;
    event.id = record.key.partition.clone();
    Ok(event)
}

#[async_trait]
impl EventService for StoreEventService {
    async fn get(&self, id: &str) -> Result<Option<Event>> {
        if id.is_empty() {
            return Ok(None);
        }
        let key = ItemKey::new(id, event_sort_key(id));
        match self.store.get_item(&key).await? {
            Some(record) => Ok(Some(decode_event(&record)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, user_name: &str) -> Result<Vec<EventSummary>> {
        let records = self
            .store
            .query(&KeyCondition::OwnerIndex(owner_sort_key(user_name)))
            .await?;

        let summaries = records
            .iter()
            .map(|record| -> Result<EventSummary> {
                let owner: EventOwner = record.to_entity()?;
                let mut summary = owner.event_summary;
                summary.id = record.key.partition.clone();
                Ok(summary)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(user = user_name, count = summaries.len(), "listed events");
        Ok(summaries)
    }

    async fn list_by(&self, filter: &EventFilter) -> Result<Vec<EventSummary>> {
        let records = self.store.scan(ItemKind::Event.prefix()).await?;
        let scanned = records.len();

        let mut summaries = Vec::new();
        for record in &records {
            let summary = decode_event(record)?.to_summary();
            if filter(&summary) {
                summaries.push(summary);
            }
        }

        tracing::debug!(scanned, matched = summaries.len(), "filtered events");
        Ok(summaries)
    }

    async fn create_or_update(&self, event_manager: &str, mut event: Event) -> Result<Event> {
        validate_event(&event)?;

        if event.id.is_empty() {
            event.id = generate_random_id();
        } else {
            self.require_owner(event_manager, &event.id).await?;
        }

        // Read-then-write: concurrent updates of one event race, last write wins.
        let existing = self.get(&event.id).await?;
        let now = Utc::now();
        event.time_created_on = existing
            .as_ref()
            .and_then(|prior| prior.time_created_on)
            .or(Some(now));
        event.time_updated_on = Some(now);

        let event_record =
            Record::from_entity(ItemKey::new(&event.id, event_sort_key(&event.id)), &event)?;
        let owner_record = Self::owner_record(&event.id, event_manager, &event)?;

        self.store
            .transact_write(vec![WriteOp::Put(event_record), WriteOp::Put(owner_record)])
            .await?;

        tracing::info!(
            event_id = %event.id,
            name = %event.name,
            created = existing.is_none(),
            "stored event"
        );
        Ok(event)
    }

    async fn delete(&self, event_manager: &str, id: &str) -> Result<()> {
        self.require_owner(event_manager, id).await?;

        let records = self
            .store
            .query(&KeyCondition::Partition(id.to_string()))
            .await?;
        let count = records.len();

        let ops = records
            .into_iter()
            .map(|record| WriteOp::Delete(record.key))
            .collect();
        self.store.transact_write(ops).await?;

        tracing::info!(event_id = id, items = count, "deleted event");
        Ok(())
    }

    async fn list_owners(&self, id: &str) -> Result<EventSharedEmails> {
        let records = self
            .store
            .query(&KeyCondition::PartitionWithPrefix {
                partition: id.to_string(),
                prefix: ItemKind::Owner.prefix().to_string(),
            })
            .await?;

        let emails = records
            .iter()
            .filter_map(|record| owner_email(&record.key.sort))
            .map(str::to_string)
            .collect();

        Ok(EventSharedEmails::new(id, emails))
    }

    async fn create_owner(
        &self,
        event_manager: &str,
        shared: EventSharedEmails,
    ) -> Result<EventSharedEmails> {
        self.require_owner(event_manager, &shared.event_id).await?;
        let emails = normalize_shared_emails(&shared)?;

        let event = self
            .get(&shared.event_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Event", &shared.event_id))?;

        let ops = emails
            .iter()
            .map(|email| Self::owner_record(&event.id, email, &event).map(WriteOp::Put))
            .collect::<Result<Vec<_>>>()?;
        self.store.transact_write(ops).await?;

        tracing::info!(event_id = %event.id, owners = emails.len(), "shared event");
        Ok(EventSharedEmails::new(shared.event_id, emails))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use eventplanner_core::event::ValidationError;
    use eventplanner_core::storage::{StoreError, MAX_TRANSACTION_ITEMS};

    use crate::services::StoreAuthorizationService;
    use crate::storage::InMemoryStore;

    fn service(store: &InMemoryStore) -> StoreEventService {
        let store: Arc<dyn KeyValueStore> = Arc::new(store.clone());
        let authorization = Arc::new(StoreAuthorizationService::new(store.clone()));
        StoreEventService::new(store, authorization)
    }

    fn reunion() -> Event {
        Event::new("Reunion", "Lake house", Utc::now() + Duration::days(30))
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let store = InMemoryStore::new();
        let events = service(&store);

        let created = events
            .create_or_update("ana@x.com", reunion().with_description("Family"))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(created.time_created_on.is_some());
        let fetched = events.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.description, "Family");
    }

    #[tokio::test]
    async fn test_create_writes_event_and_owner() {
        let store = InMemoryStore::new();
        let events = service(&store);

        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        assert_eq!(store.len().await, 2);
        let owners = events.list_owners(&created.id).await.unwrap();
        assert_eq!(owners.shared_emails, vec!["ANA@X.COM".to_string()]);
    }

    #[tokio::test]
    async fn test_get_missing_and_empty_id() {
        let store = InMemoryStore::new();
        let events = service(&store);

        assert!(events.get("nope").await.unwrap().is_none());
        assert!(events.get("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_created_and_refreshes_updated() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let mut edit = created.clone();
        edit.name = "Reunion 2".to_string();
        edit.time_created_on = None;
        let updated = events.create_or_update("ana@x.com", edit).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.time_created_on, created.time_created_on);
        assert!(updated.time_updated_on > created.time_updated_on);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let first = events
            .create_or_update("ana@x.com", created.clone())
            .await
            .unwrap();
        let second = events
            .create_or_update("ana@x.com", first.clone())
            .await
            .unwrap();

        assert_eq!(second.name, first.name);
        assert_eq!(second.time_created_on, first.time_created_on);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let result = events.create_or_update("mallory@x.com", created).await;

        assert_eq!(result, Err(ServiceError::Unauthorized));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_validates() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let mut event = reunion();
        event.main_location = String::new();

        let result = events.create_or_update("ana@x.com", event).await;

        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::MissingField { .. }))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_returns_owned_and_shared_events() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let first = events.create_or_update("ana@x.com", reunion()).await.unwrap();
        let second = events
            .create_or_update("bob@x.com", Event::new("Wedding", "Church", Utc::now()))
            .await
            .unwrap();
        events
            .create_owner(
                "bob@x.com",
                EventSharedEmails::new(&second.id, vec!["ana@x.com".to_string()]),
            )
            .await
            .unwrap();

        let mut ids: Vec<String> = events
            .list("ANA@x.com")
            .await
            .unwrap()
            .into_iter()
            .map(|summary| summary.id)
            .collect();
        ids.sort();
        let mut expected = vec![first.id, second.id];
        expected.sort();

        assert_eq!(ids, expected);
        assert_eq!(events.list("bob@x.com").await.unwrap().len(), 1);
        assert!(events.list("carol@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_filters_scan() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let upcoming = events
            .create_or_update("ana@x.com", reunion().with_notifications(true))
            .await
            .unwrap();
        events
            .create_or_update("ana@x.com", reunion())
            .await
            .unwrap();

        let matched = events
            .list_by(&|summary: &EventSummary| summary.notification_enabled)
            .await
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, upcoming.id);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_every_item() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();
        let other = events.create_or_update("ana@x.com", reunion()).await.unwrap();
        for sort in ["GUEST-g1", "TASK-t1", "EXPENSE_CATEGORY-c1"] {
            store
                .put_item(Record::new(ItemKey::new(&created.id, sort), Default::default()))
                .await
                .unwrap();
        }

        events.delete("ana@x.com", &created.id).await.unwrap();

        let remaining = store
            .query(&KeyCondition::Partition(created.id.clone()))
            .await
            .unwrap();
        assert!(remaining.is_empty());
        assert!(events.get(&other.id).await.unwrap().is_some());
        assert_eq!(events.list("ana@x.com").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_delete_leaves_event() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let result = events.delete("mallory@x.com", &created.id).await;

        assert_eq!(result, Err(ServiceError::Unauthorized));
        assert!(events.get(&created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_too_large_fails_atomically() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();
        for i in 0..MAX_TRANSACTION_ITEMS {
            store
                .put_item(Record::new(
                    ItemKey::new(&created.id, format!("TASK-{i}")),
                    Default::default(),
                ))
                .await
                .unwrap();
        }

        let result = events.delete("ana@x.com", &created.id).await;

        assert!(matches!(
            result,
            Err(ServiceError::Store(StoreError::TransactionTooLarge { .. }))
        ));
        assert_eq!(store.len().await, MAX_TRANSACTION_ITEMS + 2);
    }

    #[tokio::test]
    async fn test_create_owner_shares_event() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let shared = events
            .create_owner(
                "ana@x.com",
                EventSharedEmails::new(
                    &created.id,
                    vec![
                        "bob@x.com".to_string(),
                        "Bob@X.com".to_string(),
                        "carol@x.com".to_string(),
                    ],
                ),
            )
            .await
            .unwrap();

        assert_eq!(shared.shared_emails, vec!["BOB@X.COM", "CAROL@X.COM"]);
        let owners = events.list_owners(&created.id).await.unwrap();
        assert_eq!(owners.shared_emails.len(), 3);
        assert!(owners.contains("bob@x.com"));

        // Shared users may now update the event.
        let mut edit = created.clone();
        edit.name = "Reunion (by Bob)".to_string();
        events.create_or_update("bob@x.com", edit).await.unwrap();
    }

    #[tokio::test]
    async fn test_non_ascii_owner_is_authorized_and_listed() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events
            .create_or_update("jürgen@x.com", reunion())
            .await
            .unwrap();

        let authorization = StoreAuthorizationService::new(Arc::new(store.clone()));
        assert!(authorization.authorize("jürgen@x.com", &created.id).await);
        assert!(authorization.authorize("JÜRGEN@X.COM", &created.id).await);

        let owners = events.list_owners(&created.id).await.unwrap();
        assert_eq!(owners.shared_emails, vec!["JÜRGEN@X.COM"]);
        assert!(owners.contains("jürgen@x.com"));
    }

    #[tokio::test]
    async fn test_create_owner_rejects_prefixed_email() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let result = events
            .create_owner(
                "ana@x.com",
                EventSharedEmails::new(
                    &created.id,
                    vec!["bob@x.com".to_string(), "owner-evil@x.com".to_string()],
                ),
            )
            .await;

        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::PrefixedEmail(_)))
        ));
        assert_eq!(events.list_owners(&created.id).await.unwrap().shared_emails.len(), 1);
    }

    #[tokio::test]
    async fn test_create_owner_requires_ownership() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();

        let result = events
            .create_owner(
                "mallory@x.com",
                EventSharedEmails::new(&created.id, vec!["mallory@x.com".to_string()]),
            )
            .await;

        assert_eq!(result, Err(ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn test_create_owner_for_missing_event() {
        let store = InMemoryStore::new();
        let events = service(&store);
        let created = events.create_or_update("ana@x.com", reunion()).await.unwrap();
        store
            .delete_item(&ItemKey::new(&created.id, event_sort_key(&created.id)))
            .await
            .unwrap();

        let result = events
            .create_owner(
                "ana@x.com",
                EventSharedEmails::new(&created.id, vec!["bob@x.com".to_string()]),
            )
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_closed_store_surfaces_connection_error() {
        let store = InMemoryStore::new();
        let events = service(&store);
        store.close().await.unwrap();

        let result = events.list("ana@x.com").await;

        assert!(matches!(
            result,
            Err(ServiceError::Store(StoreError::ConnectionFailed(_)))
        ));
    }
}
