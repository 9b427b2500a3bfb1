use std::sync::Arc;

use async_trait::async_trait;

use eventplanner_core::event::EventOwner;
use eventplanner_core::service::AuthorizationService;
use eventplanner_core::storage::keys::owner_sort_key;
use eventplanner_core::storage::{ItemKey, KeyValueStore};

/// Authorizes users by probing for their owner record on the event.
#[derive(Clone)]
pub struct StoreAuthorizationService {
    store: Arc<dyn KeyValueStore>,
}

impl StoreAuthorizationService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthorizationService for StoreAuthorizationService {
    async fn authorize(&self, user_name: &str, event_id: &str) -> bool {
        let key = ItemKey::new(event_id, owner_sort_key(user_name));

        let record = match self.store.get_item(&key).await {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(event_id, user = user_name, error = %e, "authorization lookup failed");
                return false;
            }
        };

        match record.to_entity::<EventOwner>() {
            Ok(owner) => !owner.event_summary.id.is_empty(),
            Err(e) => {
                tracing::warn!(event_id, user = user_name, error = %e, "invalid owner record");
                false
            }
        }
    }
}
