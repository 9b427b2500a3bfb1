//! Sort-key encoding for the single-table layout.
//!
//! Every item of an event shares the event id as partition key. The sort key
//! tells the item kinds apart by prefix:
//!
//! | Kind              | Sort key                         |
//! |-------------------|----------------------------------|
//! | Event             | `EVENT-<eventId>`                |
//! | Owner             | `OWNER-<UPPER(email)>`           |
//! | Guest             | `GUEST-<guestId>`                |
//! | Task              | `TASK-<taskId>`                  |
//! | Expense category  | `EXPENSE_CATEGORY-<categoryId>`  |

use std::fmt;

pub const EVENT_PREFIX: &str = "EVENT-";
pub const OWNER_PREFIX: &str = "OWNER-";
pub const GUEST_PREFIX: &str = "GUEST-";
pub const TASK_PREFIX: &str = "TASK-";
pub const EXPENSE_CATEGORY_PREFIX: &str = "EXPENSE_CATEGORY-";

/// The kind of entity an item holds, derived from its sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Event,
    Owner,
    Guest,
    Task,
    ExpenseCategory,
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Event,
        ItemKind::Owner,
        ItemKind::Guest,
        ItemKind::Task,
        ItemKind::ExpenseCategory,
    ];

    /// Sort-key prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            ItemKind::Event => EVENT_PREFIX,
            ItemKind::Owner => OWNER_PREFIX,
            ItemKind::Guest => GUEST_PREFIX,
            ItemKind::Task => TASK_PREFIX,
            ItemKind::ExpenseCategory => EXPENSE_CATEGORY_PREFIX,
        }
    }

    /// Encodes `id` as a sort key of this kind.
    ///
    /// Ids that already carry the prefix are returned unchanged, so encoding is
    /// idempotent.
    pub fn sort_key(self, id: &str) -> String {
        if id.starts_with(self.prefix()) {
            id.to_string()
        } else {
            format!("{}{}", self.prefix(), id)
        }
    }

    /// Decodes the id out of a sort key of this kind.
    pub fn strip<'a>(self, sort_key: &'a str) -> Option<&'a str> {
        sort_key.strip_prefix(self.prefix())
    }

    /// Resolves the kind of a sort key. Bare (unprefixed) keys have no kind.
    pub fn from_sort_key(sort_key: &str) -> Option<ItemKind> {
        Self::ALL
            .into_iter()
            .find(|kind| sort_key.starts_with(kind.prefix()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Event => "Event",
            ItemKind::Owner => "EventOwner",
            ItemKind::Guest => "Guest",
            ItemKind::Task => "Task",
            ItemKind::ExpenseCategory => "ExpenseCategory",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key of the canonical event record.
pub fn event_sort_key(event_id: &str) -> String {
    ItemKind::Event.sort_key(event_id)
}

/// Sort key of an owner record. Emails are matched case-insensitively by
/// storing them upper-cased.
pub fn owner_sort_key(email: &str) -> String {
    format!("{OWNER_PREFIX}{}", email.to_uppercase())
}

/// Recovers the (upper-cased) email from an owner sort key.
pub fn owner_email(sort_key: &str) -> Option<&str> {
    ItemKind::Owner.strip(sort_key)
}
