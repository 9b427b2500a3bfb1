//! Application state: the store and every service wired over it.
//!
//! Callers (an HTTP adapter, a scheduled job, tests) hold an [`AppState`] and
//! reach the services through its trait objects.

use std::sync::Arc;

use eventplanner_core::notification::{NotificationSender, TemplateRenderer};
use eventplanner_core::service::{
    AuthorizationService, EventActionsService, EventService, ExpenseCategoryService,
    GuestService, TaskService,
};
use eventplanner_core::storage::{KeyValueStore, Result as StoreResult};

use crate::config::Config;
use crate::notifications::AskamaTemplateRenderer;
use crate::services::{
    StoreAuthorizationService, StoreEventActionsService, StoreEventService,
    StoreExpenseCategoryService, StoreGuestService, StoreTaskService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub authorization: Arc<dyn AuthorizationService>,
    pub events: Arc<dyn EventService>,
    pub guests: Arc<dyn GuestService>,
    pub tasks: Arc<dyn TaskService>,
    pub expense_categories: Arc<dyn ExpenseCategoryService>,
    pub actions: Arc<dyn EventActionsService>,
}

impl AppState {
    /// Wires every service over `store`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        config: &Config,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let mode = config.sort_key_mode;
        let authorization: Arc<dyn AuthorizationService> =
            Arc::new(StoreAuthorizationService::new(store.clone()));
        let events: Arc<dyn EventService> =
            Arc::new(StoreEventService::new(store.clone(), authorization.clone()));
        let tasks: Arc<dyn TaskService> = Arc::new(StoreTaskService::new(store.clone(), mode));
        let guests: Arc<dyn GuestService> = Arc::new(StoreGuestService::new(
            store.clone(),
            authorization.clone(),
            mode,
        ));
        let expense_categories: Arc<dyn ExpenseCategoryService> =
            Arc::new(StoreExpenseCategoryService::new(store.clone(), mode));

        let renderer: Arc<dyn TemplateRenderer> = Arc::new(AskamaTemplateRenderer);
        let actions: Arc<dyn EventActionsService> = Arc::new(
            StoreEventActionsService::new(events.clone(), tasks.clone(), renderer, sender)
                .with_concurrency(config.notification_concurrency),
        );

        tracing::debug!(
            sort_key_mode = %mode,
            concurrency = config.notification_concurrency,
            "services initialized"
        );

        Self {
            store,
            authorization,
            events,
            guests,
            tasks,
            expense_categories,
            actions,
        }
    }

    /// Creates state backed by a fresh in-memory store.
    #[cfg(feature = "inmemory")]
    pub fn in_memory(config: &Config, sender: Arc<dyn NotificationSender>) -> Self {
        tracing::info!("using in-memory storage");
        Self::new(
            Arc::new(crate::storage::InMemoryStore::new()),
            config,
            sender,
        )
    }

    /// Creates state backed by DynamoDB using the configured table layout.
    #[cfg(feature = "dynamodb")]
    pub async fn dynamodb(config: &Config, sender: Arc<dyn NotificationSender>) -> Self {
        let store =
            crate::storage::DynamoDbStore::connect(&config.aws_config(), config.store_config())
                .await;
        Self::new(Arc::new(store), config, sender)
    }

    /// Closes the store. Later service calls fail with a connection error.
    pub async fn shutdown(&self) -> StoreResult<()> {
        self.store.close().await?;
        tracing::info!("store closed");
        Ok(())
    }
}
