mod error;
mod operations;
mod types;

pub use error::ValidationError;
pub use operations::{
    assign_expense_ids, expense_category_id, generate_id, generate_random_id, guest_id,
    normalize_shared_emails, total_amount_paid, validate_event, validate_expense,
    validate_expense_category, validate_guest, validate_task, MAX_EXPENSES_PER_CATEGORY,
};
pub use types::{
    CopyGuestRequest, Event, EventOwner, EventSharedEmails, EventSummary, Expense,
    ExpenseCategory, Guest, Task, TaskStatus,
};
