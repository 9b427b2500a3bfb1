use std::sync::Arc;

use async_trait::async_trait;

use eventplanner_core::event::{guest_id, validate_guest, CopyGuestRequest, Guest};
use eventplanner_core::service::{AuthorizationService, GuestService, Result, ServiceError};
use eventplanner_core::storage::{KeyValueStore, SortKeyMode};

use super::children::ChildItems;

/// Guest service over the single-table store.
#[derive(Clone)]
pub struct StoreGuestService {
    items: ChildItems,
    authorization: Arc<dyn AuthorizationService>,
}

impl StoreGuestService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        authorization: Arc<dyn AuthorizationService>,
        mode: SortKeyMode,
    ) -> Self {
        Self {
            items: ChildItems::new(store, mode),
            authorization,
        }
    }
}

#[async_trait]
impl GuestService for StoreGuestService {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<Guest>> {
        self.items.get(event_id, id).await
    }

    async fn list(&self, event_id: &str) -> Result<Vec<Guest>> {
        self.items.list(event_id).await
    }

    async fn create_or_update(&self, event_id: &str, mut guest: Guest) -> Result<Guest> {
        validate_guest(&guest)?;
        if guest.id.is_empty() {
            guest.id = guest_id(&guest);
        }
        self.items.put(event_id, guest).await
    }

    async fn delete(&self, event_id: &str, id: &str) -> Result<()> {
        self.items.delete::<Guest>(event_id, id).await
    }

    async fn copy_from(
        &self,
        event_manager: &str,
        event_id: &str,
        request: &CopyGuestRequest,
    ) -> Result<usize> {
        if !self.authorization.authorize(event_manager, event_id).await {
            tracing::warn!(event_id, user = event_manager, "unauthorized guest copy");
            return Err(ServiceError::Unauthorized);
        }

        let guests = self.list(&request.from_event).await?;
        let total = guests.len();

        // Not transactional: a failure leaves the guests copied so far in place.
        for (copied, mut guest) in guests.into_iter().enumerate() {
            guest.id.clear();
            if let Err(e) = self.create_or_update(event_id, guest).await {
                tracing::error!(
                    event_id,
                    from_event = %request.from_event,
                    copied,
                    total,
                    error = %e,
                    "guest copy stopped"
                );
                return Err(ServiceError::PartialCopy {
                    copied,
                    total,
                    from_event: request.from_event.clone(),
                    reason: e.to_string(),
                });
            }
        }

        tracing::info!(event_id, from_event = %request.from_event, total, "copied guests");
        Ok(total)
    }
}
