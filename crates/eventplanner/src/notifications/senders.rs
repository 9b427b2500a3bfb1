use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use eventplanner_core::notification::{NotificationError, NotificationSender};

/// Writes every notification to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send_email_notification(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        tracing::info!(recipient, subject, body_len = body.len(), "notification");
        tracing::trace!(recipient, body, "notification body");
        Ok(())
    }
}

/// A notification captured by [`RecordingNotificationSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Keeps sent notifications in memory. Recipients registered with
/// [`fail_for`](Self::fail_for) are rejected.
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<SentNotification>>,
    failing: HashSet<String>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes deliveries to `recipient` (case-insensitive) fail.
    pub fn fail_for(mut self, recipient: &str) -> Self {
        self.failing.insert(recipient.to_uppercase());
        self
    }

    /// Notifications delivered so far, in delivery order.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_email_notification(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        if self.failing.contains(&recipient.to_uppercase()) {
            return Err(NotificationError::Delivery {
                recipient: recipient.to_string(),
                reason: "rejected by recipient server".to_string(),
            });
        }

        let mut sent = self.sent.lock().map_err(|e| NotificationError::Delivery {
            recipient: recipient.to_string(),
            reason: e.to_string(),
        })?;
        sent.push(SentNotification {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sender_captures_and_fails() {
        let sender = RecordingNotificationSender::new().fail_for("bob@x.com");

        sender
            .send_email_notification("ANA@X.COM", "Subject", "Body")
            .await
            .unwrap();
        let failed = sender
            .send_email_notification("BOB@X.COM", "Subject", "Body")
            .await;

        assert!(matches!(failed, Err(NotificationError::Delivery { .. })));
        assert_eq!(
            sender.sent(),
            vec![SentNotification {
                recipient: "ANA@X.COM".to_string(),
                subject: "Subject".to_string(),
                body: "Body".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        LogNotificationSender
            .send_email_notification("ANA@X.COM", "Subject", "Body")
            .await
            .unwrap();
    }
}
