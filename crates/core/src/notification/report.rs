use super::NotificationError;

/// A delivery that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub event_id: String,
    pub recipient: String,
    pub reason: String,
}

/// Outcome of one notification run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationReport {
    /// Events that had pending tasks and at least one owner.
    pub events_notified: usize,
    pub deliveries_attempted: usize,
    pub deliveries_succeeded: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl NotificationReport {
    pub fn record_success(&mut self) {
        self.deliveries_attempted += 1;
        self.deliveries_succeeded += 1;
    }

    pub fn record_failure(&mut self, event_id: &str, recipient: &str, error: NotificationError) {
        self.deliveries_attempted += 1;
        let reason = match error {
            NotificationError::Delivery { reason, .. } => reason,
            other => other.to_string(),
        };
        self.failures.push(DeliveryFailure {
            event_id: event_id.to_string(),
            recipient: recipient.to_string(),
            reason,
        });
    }

    /// True when some, but not necessarily all, deliveries failed.
    pub fn is_partial_failure(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_not_a_failure() {
        let report = NotificationReport::default();
        assert!(!report.is_partial_failure());
        assert_eq!(report.deliveries_attempted, 0);
    }

    #[test]
    fn test_record_failure() {
        let mut report = NotificationReport::default();
        report.record_success();
        report.record_failure(
            "e1",
            "BOB@X.COM",
            NotificationError::Delivery {
                recipient: "BOB@X.COM".to_string(),
                reason: "bounced".to_string(),
            },
        );

        assert!(report.is_partial_failure());
        assert_eq!(report.deliveries_attempted, 2);
        assert_eq!(report.deliveries_succeeded, 1);
        assert_eq!(
            report.failures,
            vec![DeliveryFailure {
                event_id: "e1".to_string(),
                recipient: "BOB@X.COM".to_string(),
                reason: "bounced".to_string(),
            }]
        );
    }
}
