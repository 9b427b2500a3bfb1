use thiserror::Error;

/// Errors raised when an entity fails validation before it is stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity} {field} is required")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("trying to create {count} expenses, more than {max} is not allowed")]
    TooManyExpenses { count: usize, max: usize },
    #[error("plain emails expected, got {0}")]
    PrefixedEmail(String),
}

impl ValidationError {
    pub(crate) fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}
