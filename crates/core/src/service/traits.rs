use async_trait::async_trait;

use super::Result;
use crate::event::{
    CopyGuestRequest, Event, EventSharedEmails, EventSummary, ExpenseCategory, Guest, Task,
};
use crate::notification::NotificationReport;

/// Predicate used by batch jobs to select events out of a full scan.
pub type EventFilter = dyn Fn(&EventSummary) -> bool + Send + Sync;

/// Answers whether a user owns (or has been shared) an event.
#[async_trait]
pub trait AuthorizationService: Send + Sync {
    /// True only when an owner record for `user_name` exists on the event.
    /// Store failures count as "not authorized".
    async fn authorize(&self, user_name: &str, event_id: &str) -> bool;
}

#[async_trait]
pub trait EventService: Send + Sync {
    /// Gets an event by id. Returns `None` for a missing event.
    async fn get(&self, id: &str) -> Result<Option<Event>>;

    /// Lists the events `user_name` owns or has been shared.
    async fn list(&self, user_name: &str) -> Result<Vec<EventSummary>>;

    /// Lists every event whose summary satisfies `filter`.
    ///
    /// Backed by a full table scan; cost grows with the number of items in the
    /// table, not the number of matches.
    async fn list_by(&self, filter: &EventFilter) -> Result<Vec<EventSummary>>;

    /// Creates the event when it has no id, otherwise updates it.
    ///
    /// Updates require `event_manager` to own the event. The event record and
    /// the manager's owner record are written together.
    async fn create_or_update(&self, event_manager: &str, event: Event) -> Result<Event>;

    /// Deletes the event and every item stored under it in one transaction.
    async fn delete(&self, event_manager: &str, id: &str) -> Result<()>;

    /// Lists the (upper-cased) emails the event is shared with.
    async fn list_owners(&self, id: &str) -> Result<EventSharedEmails>;

    /// Shares the event with each email in `shared`.
    async fn create_owner(
        &self,
        event_manager: &str,
        shared: EventSharedEmails,
    ) -> Result<EventSharedEmails>;
}

#[async_trait]
pub trait GuestService: Send + Sync {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<Guest>>;
    async fn list(&self, event_id: &str) -> Result<Vec<Guest>>;
    async fn create_or_update(&self, event_id: &str, guest: Guest) -> Result<Guest>;
    async fn delete(&self, event_id: &str, id: &str) -> Result<()>;

    /// Copies every guest of `request.from_event` into `event_id`.
    ///
    /// Guests are written one at a time. Returns how many were copied; a
    /// failure part-way returns [`ServiceError::PartialCopy`](super::ServiceError::PartialCopy).
    async fn copy_from(
        &self,
        event_manager: &str,
        event_id: &str,
        request: &CopyGuestRequest,
    ) -> Result<usize>;
}

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<Task>>;
    async fn list(&self, event_id: &str) -> Result<Vec<Task>>;
    async fn create_or_update(&self, event_id: &str, task: Task) -> Result<Task>;
    async fn delete(&self, event_id: &str, id: &str) -> Result<()>;
}

#[async_trait]
pub trait ExpenseCategoryService: Send + Sync {
    async fn get(&self, event_id: &str, id: &str) -> Result<Option<ExpenseCategory>>;
    async fn list(&self, event_id: &str) -> Result<Vec<ExpenseCategory>>;

    /// Validates, assigns line-item ids and recomputes `amount_paid` before
    /// writing.
    async fn create_or_update(
        &self,
        event_id: &str,
        category: ExpenseCategory,
    ) -> Result<ExpenseCategory>;

    async fn delete(&self, event_id: &str, id: &str) -> Result<()>;
}

/// Batch jobs that act on many events at once.
#[async_trait]
pub trait EventActionsService: Send + Sync {
    /// Sends every owner of each upcoming, notification-enabled event a summary
    /// of its pending tasks.
    async fn send_pending_tasks_notifications(&self) -> Result<NotificationReport>;
}
