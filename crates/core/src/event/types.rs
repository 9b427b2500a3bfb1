use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planned event. Guests, tasks and expense categories hang off its id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub main_location: String,
    pub event_day: Option<DateTime<Utc>>,
    pub description: String,
    #[serde(rename = "isNotificationEnabled")]
    pub notification_enabled: bool,
    pub time_created_on: Option<DateTime<Utc>>,
    pub time_updated_on: Option<DateTime<Utc>>,
}

impl Event {
    /// Creates an event without an id; one is assigned on first write.
    pub fn new(
        name: impl Into<String>,
        main_location: impl Into<String>,
        event_day: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            main_location: main_location.into(),
            event_day: Some(event_day),
            ..Default::default()
        }
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notification_enabled = enabled;
        self
    }

    /// Returns the summary copy stored in every owner record.
    pub fn to_summary(&self) -> EventSummary {
        EventSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            main_location: self.main_location.clone(),
            event_day: self.event_day,
            notification_enabled: self.notification_enabled,
            time_created_on: self.time_created_on,
        }
    }
}

/// The denormalized view of an event used in listings and owner records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub main_location: String,
    pub event_day: Option<DateTime<Utc>>,
    #[serde(rename = "isNotificationEnabled")]
    pub notification_enabled: bool,
    pub time_created_on: Option<DateTime<Utc>>,
}

/// One owner record: a user sharing an event, with a copy of its summary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventOwner {
    pub owner_email: String,
    pub event_summary: EventSummary,
}

impl EventOwner {
    /// Builds the owner record for `owner_email`. The email is stored upper-cased.
    pub fn new(owner_email: &str, event: &Event) -> Self {
        Self {
            owner_email: owner_email.to_uppercase(),
            event_summary: event.to_summary(),
        }
    }
}

/// The set of users an event is shared with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSharedEmails {
    pub event_id: String,
    pub shared_emails: Vec<String>,
}

impl EventSharedEmails {
    pub fn new(event_id: impl Into<String>, shared_emails: Vec<String>) -> Self {
        Self {
            event_id: event_id.into(),
            shared_emails,
        }
    }

    /// Membership check under the same Unicode upper-casing used for owner keys.
    pub fn contains(&self, email: &str) -> bool {
        let email = email.to_uppercase();
        self.shared_emails
            .iter()
            .any(|shared| shared.to_uppercase() == email)
    }
}

/// A guest invited to an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guest {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_of: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "isTentative")]
    pub tentative: bool,
    pub country: String,
    pub state: String,
    pub requires_invite: bool,
    #[serde(rename = "isNotAttending")]
    pub not_attending: bool,
    pub number_of_seats: u32,
    pub time_created_on: Option<DateTime<Utc>>,
    pub time_updated_on: Option<DateTime<Utc>>,
}

impl Guest {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        number_of_seats: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            number_of_seats,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn tentative(mut self) -> Self {
        self.tentative = true;
        self
    }
}

/// Request body for copying the guest list of another event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyGuestRequest {
    pub from_event: String,
}

impl CopyGuestRequest {
    pub fn new(from_event: impl Into<String>) -> Self {
        Self {
            from_event: from_event.into(),
        }
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Done => "DONE",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A to-do item for an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    pub time_created_on: Option<DateTime<Utc>>,
    pub time_updated_on: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a pending task.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// A budget line grouping individual expenses.
///
/// `amount_paid` is derived from `expenses` on every write and cannot be set
/// independently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseCategory {
    pub id: String,
    pub category: String,
    pub amount_projected: f64,
    pub amount_paid: f64,
    pub amount_total: f64,
    pub expenses: Vec<Expense>,
    pub time_created_on: Option<DateTime<Utc>>,
    pub time_updated_on: Option<DateTime<Utc>>,
}

impl ExpenseCategory {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_projected(mut self, amount: f64) -> Self {
        self.amount_projected = amount;
        self
    }

    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }
}

/// A single payment within an expense category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: String,
    pub who_paid: String,
    pub time_paid_on: Option<DateTime<Utc>>,
    pub amount_paid: f64,
    pub time_created_on: Option<DateTime<Utc>>,
    pub time_updated_on: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(who_paid: impl Into<String>, amount_paid: f64) -> Self {
        Self {
            who_paid: who_paid.into(),
            amount_paid,
            ..Default::default()
        }
    }
}
