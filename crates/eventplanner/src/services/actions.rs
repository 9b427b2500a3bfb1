use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};

use eventplanner_core::event::{EventSummary, Task};
use eventplanner_core::notification::{
    NotificationError, NotificationReport, NotificationSender, TemplateRenderer,
};
use eventplanner_core::service::{
    EventActionsService, EventService, Result, ServiceError, TaskService,
};

/// Deliveries in flight at once when no limit is configured.
pub const DEFAULT_NOTIFICATION_CONCURRENCY: usize = 4;

/// Batch jobs built on the event and task services.
pub struct StoreEventActionsService {
    events: Arc<dyn EventService>,
    tasks: Arc<dyn TaskService>,
    renderer: Arc<dyn TemplateRenderer>,
    sender: Arc<dyn NotificationSender>,
    concurrency: usize,
}

impl StoreEventActionsService {
    pub fn new(
        events: Arc<dyn EventService>,
        tasks: Arc<dyn TaskService>,
        renderer: Arc<dyn TemplateRenderer>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            events,
            tasks,
            renderer,
            sender,
            concurrency: DEFAULT_NOTIFICATION_CONCURRENCY,
        }
    }

    /// Caps how many deliveries run at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn pending_tasks(&self, event_id: &str) -> Result<Vec<Task>> {
        let tasks = self.tasks.list(event_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.status.is_pending())
            .collect())
    }

    /// Sends one message to every recipient and records each outcome.
    async fn deliver(
        &self,
        event_id: &str,
        recipients: Vec<String>,
        subject: &str,
        body: &str,
        report: &mut NotificationReport,
    ) {
        let subject: Arc<str> = Arc::from(subject);
        let body: Arc<str> = Arc::from(body);
        let outcomes: Vec<(String, std::result::Result<(), NotificationError>)> =
            stream::iter(recipients)
                .map(|recipient| {
                    let sender = Arc::clone(&self.sender);
                    let subject = Arc::clone(&subject);
                    let body = Arc::clone(&body);
                    async move {
                        let outcome = sender
                            .send_email_notification(&recipient, &subject, &body)
                            .await;
                        (recipient, outcome)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        for (recipient, outcome) in outcomes {
            match outcome {
                Ok(()) => report.record_success(),
                Err(e) => {
                    tracing::warn!(event_id, recipient = %recipient, error = %e, "notification failed");
                    report.record_failure(event_id, &recipient, e);
                }
            }
        }
    }
}

fn render_error(error: NotificationError) -> ServiceError {
    match error {
        NotificationError::Render(reason) => ServiceError::Render(reason),
        other => ServiceError::Render(other.to_string()),
    }
}

#[async_trait]
impl EventActionsService for StoreEventActionsService {
    async fn send_pending_tasks_notifications(&self) -> Result<NotificationReport> {
        let now = Utc::now();
        let upcoming = move |event: &EventSummary| {
            event.notification_enabled && event.event_day.is_some_and(|day| day > now)
        };
        let events = self.events.list_by(&upcoming).await?;
        tracing::info!(candidates = events.len(), "sending pending task notifications");

        let mut report = NotificationReport::default();
        for event in events {
            let tasks = self.pending_tasks(&event.id).await?;
            if tasks.is_empty() {
                continue;
            }

            let message = self
                .renderer
                .render_pending_tasks(&event.name, &tasks)
                .map_err(render_error)?;
            let owners = self.events.list_owners(&event.id).await?;
            if owners.shared_emails.is_empty() {
                continue;
            }

            tracing::info!(
                event_id = %event.id,
                recipients = owners.shared_emails.len(),
                tasks = tasks.len(),
                "notifying owners"
            );
            report.events_notified += 1;
            self.deliver(
                &event.id,
                owners.shared_emails,
                &message.subject,
                &message.body,
                &mut report,
            )
            .await;
        }

        tracing::info!(
            events = report.events_notified,
            attempted = report.deliveries_attempted,
            failed = report.failures.len(),
            "pending task notifications done"
        );
        Ok(report)
    }
}
