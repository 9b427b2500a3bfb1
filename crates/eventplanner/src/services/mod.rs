//! Service implementations over a [`KeyValueStore`](eventplanner_core::storage::KeyValueStore).
//!
//! Each service holds the store behind an `Arc<dyn _>` so backends can be
//! swapped at start-up. Entity services that mutate an existing event check
//! ownership through an [`AuthorizationService`](eventplanner_core::service::AuthorizationService).

mod actions;
mod authorization;
mod children;
mod events;
mod expenses;
mod guests;
mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::{StoreEventActionsService, DEFAULT_NOTIFICATION_CONCURRENCY};
pub use authorization::StoreAuthorizationService;
pub use events::StoreEventService;
pub use expenses::StoreExpenseCategoryService;
pub use guests::StoreGuestService;
pub use tasks::StoreTaskService;
