//! Pure validation and identifier functions for event entities.

use md5::{Digest, Md5};
use uuid::Uuid;

use super::{Event, EventSharedEmails, Expense, ExpenseCategory, Guest, Task, ValidationError};
use crate::storage::keys::OWNER_PREFIX;

/// Upper bound on line items per category, keeps a single item well under the
/// store's item size limit.
pub const MAX_EXPENSES_PER_CATEGORY: usize = 80;

/// Deterministic id derived from a human-facing name.
///
/// The value is upper-cased before hashing so that "Ana Díaz" and "ANA DÍAZ"
/// map to the same id. Returns the lowercase hex MD5 digest.
pub fn generate_id(value: &str) -> String {
    hex::encode(Md5::digest(value.to_uppercase().as_bytes()))
}

/// Random v4 UUID in its hyphenated form.
pub fn generate_random_id() -> String {
    Uuid::new_v4().to_string()
}

/// Natural id of a guest: hash of first and last name.
pub fn guest_id(guest: &Guest) -> String {
    generate_id(&format!("{}{}", guest.first_name, guest.last_name))
}

/// Natural id of an expense category: hash of its name.
pub fn expense_category_id(category: &ExpenseCategory) -> String {
    generate_id(&category.category)
}

/// Sum of `amount_paid` across all line items.
pub fn total_amount_paid(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount_paid).sum()
}

/// Gives every line item without an id a fresh random one.
pub fn assign_expense_ids(expenses: &mut [Expense]) {
    for expense in expenses.iter_mut().filter(|e| e.id.is_empty()) {
        expense.id = generate_random_id();
    }
}

fn require(value: &str, entity: &'static str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(entity, field));
    }
    Ok(())
}

pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    require(&event.name, "Event", "name")?;
    require(&event.main_location, "Event", "mainLocation")?;
    if event.event_day.is_none() {
        return Err(ValidationError::missing("Event", "eventDay"));
    }
    Ok(())
}

pub fn validate_guest(guest: &Guest) -> Result<(), ValidationError> {
    require(&guest.first_name, "Guest", "firstName")?;
    require(&guest.last_name, "Guest", "lastName")?;
    if guest.number_of_seats == 0 {
        return Err(ValidationError::missing("Guest", "numberOfSeats"));
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    require(&task.name, "Task", "name")
}

pub fn validate_expense(expense: &Expense) -> Result<(), ValidationError> {
    require(&expense.who_paid, "Expense", "whoPaid")
}

/// Validates a category and each of its line items.
pub fn validate_expense_category(category: &ExpenseCategory) -> Result<(), ValidationError> {
    if category.expenses.len() > MAX_EXPENSES_PER_CATEGORY {
        return Err(ValidationError::TooManyExpenses {
            count: category.expenses.len(),
            max: MAX_EXPENSES_PER_CATEGORY,
        });
    }
    for expense in &category.expenses {
        validate_expense(expense)?;
    }
    require(&category.category, "ExpenseCategory", "category")
}

/// Validates a sharing request and returns the upper-cased, de-duplicated emails.
///
/// Emails that already carry the owner sort-key prefix are rejected so a caller
/// cannot address arbitrary sort keys through this path.
pub fn normalize_shared_emails(shared: &EventSharedEmails) -> Result<Vec<String>, ValidationError> {
    require(&shared.event_id, "EventSharedEmails", "eventId")?;
    if shared.shared_emails.is_empty() {
        return Err(ValidationError::missing("EventSharedEmails", "sharedEmails"));
    }

    let mut emails: Vec<String> = Vec::with_capacity(shared.shared_emails.len());
    for email in &shared.shared_emails {
        let email = email.trim().to_uppercase();
        if email.is_empty() {
            return Err(ValidationError::missing("EventSharedEmails", "sharedEmails"));
        }
        if email.starts_with(OWNER_PREFIX) {
            return Err(ValidationError::PrefixedEmail(email));
        }
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    Ok(emails)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_generate_id_is_md5_of_upper_case() {
        let id = generate_id("AnaPerez");
        assert_eq!(id.len(), 32);
        assert_eq!(id, generate_id("ANAPEREZ"));
        assert_eq!(id, generate_id("anaperez"));
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_id_known_digest() {
        // md5("") is a well known constant
        assert_eq!(generate_id(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(generate_id("abc"), "902fbdd2b1df0c4f70b4a5d23525e932");
    }

    #[test]
    fn test_generate_random_id_is_uuid() {
        let id = generate_random_id();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, generate_random_id());
    }

    #[test]
    fn test_validate_event_requires_fields() {
        let mut event = Event::new("Reunion", "Park", Utc::now());
        assert!(validate_event(&event).is_ok());

        event.main_location.clear();
        assert_eq!(
            validate_event(&event),
            Err(ValidationError::missing("Event", "mainLocation"))
        );

        let no_day = Event {
            name: "Reunion".to_string(),
            main_location: "Park".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_event(&no_day),
            Err(ValidationError::missing("Event", "eventDay"))
        );
    }

    #[test]
    fn test_validate_guest_requires_seats() {
        assert!(validate_guest(&Guest::new("Ana", "Perez", 2)).is_ok());
        assert_eq!(
            validate_guest(&Guest::new("Ana", "Perez", 0)),
            Err(ValidationError::missing("Guest", "numberOfSeats"))
        );
        assert_eq!(
            validate_guest(&Guest::new("", "Perez", 1)),
            Err(ValidationError::missing("Guest", "firstName"))
        );
    }

    #[test]
    fn test_validate_expense_category_cap() {
        let mut category = ExpenseCategory::new("Food");
        category.expenses = (0..MAX_EXPENSES_PER_CATEGORY)
            .map(|_| Expense::new("ana", 1.0))
            .collect();
        assert!(validate_expense_category(&category).is_ok());

        category.expenses.push(Expense::new("ana", 1.0));
        assert_eq!(
            validate_expense_category(&category),
            Err(ValidationError::TooManyExpenses { count: 81, max: 80 })
        );
    }

    #[test]
    fn test_validate_expense_category_checks_line_items() {
        let category = ExpenseCategory::new("Food").with_expense(Expense::new("", 3.0));
        assert_eq!(
            validate_expense_category(&category),
            Err(ValidationError::missing("Expense", "whoPaid"))
        );
    }

    #[test]
    fn test_assign_expense_ids_keeps_existing() {
        let mut expenses = vec![Expense::new("ana", 1.0), Expense::new("bob", 2.0)];
        expenses[0].id = "keep-me".to_string();

        assign_expense_ids(&mut expenses);

        assert_eq!(expenses[0].id, "keep-me");
        assert!(Uuid::parse_str(&expenses[1].id).is_ok());
        assert_eq!(total_amount_paid(&expenses), 3.0);
    }

    #[test]
    fn test_normalize_shared_emails() {
        let shared = EventSharedEmails::new(
            "event-1",
            vec!["b@x.com".to_string(), "B@X.COM".to_string(), "c@x.com".to_string()],
        );
        assert_eq!(
            normalize_shared_emails(&shared).unwrap(),
            vec!["B@X.COM".to_string(), "C@X.COM".to_string()]
        );
    }

    #[test]
    fn test_normalize_shared_emails_rejects_owner_prefix() {
        let shared = EventSharedEmails::new("event-1", vec!["owner-a@x.com".to_string()]);
        assert_eq!(
            normalize_shared_emails(&shared),
            Err(ValidationError::PrefixedEmail("OWNER-A@X.COM".to_string()))
        );
    }

    #[test]
    fn test_normalize_shared_emails_requires_emails() {
        let shared = EventSharedEmails::new("event-1", vec![]);
        assert!(normalize_shared_emails(&shared).is_err());
    }
}
