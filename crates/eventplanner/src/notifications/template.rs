use askama::Template;

use eventplanner_core::event::Task;
use eventplanner_core::notification::{NotificationError, RenderedMessage, TemplateRenderer};

/// One table row of the pending-task e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTaskRow {
    pub name: String,
    pub status: String,
    pub created: String,
}

impl From<&Task> for PendingTaskRow {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            status: task.status.to_string(),
            created: task
                .time_created_on
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_default(),
        }
    }
}

/// HTML body listing the pending tasks of one event.
#[derive(Template)]
#[template(path = "pending_tasks.html")]
pub struct PendingTasksTemplate<'a> {
    pub event_name: &'a str,
    pub rows: Vec<PendingTaskRow>,
}

/// Renders pending-task notifications with askama.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaTemplateRenderer;

impl TemplateRenderer for AskamaTemplateRenderer {
    fn render_pending_tasks(
        &self,
        event_name: &str,
        tasks: &[Task],
    ) -> Result<RenderedMessage, NotificationError> {
        let template = PendingTasksTemplate {
            event_name,
            rows: tasks.iter().map(PendingTaskRow::from).collect(),
        };
        let body = template
            .render()
            .map_err(|e| NotificationError::Render(e.to_string()))?;

        Ok(RenderedMessage {
            subject: format!("Pending Tasks for {event_name}"),
            body,
        })
    }
}
