use async_trait::async_trait;

use super::NotificationError;
use crate::event::Task;

/// A rendered e-mail ready to hand to a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// Delivers a rendered notification to one recipient.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_email_notification(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}

/// Renders the pending-task summary for one event.
pub trait TemplateRenderer: Send + Sync {
    fn render_pending_tasks(
        &self,
        event_name: &str,
        tasks: &[Task],
    ) -> Result<RenderedMessage, NotificationError>;
}
