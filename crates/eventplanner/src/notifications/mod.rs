//! Notification plumbing for the pending-task batch: the askama renderer and
//! the senders that deliver rendered messages.

mod senders;
mod template;

pub use senders::{LogNotificationSender, RecordingNotificationSender, SentNotification};
pub use template::{AskamaTemplateRenderer, PendingTaskRow, PendingTasksTemplate};
