use thiserror::Error;

use crate::event::ValidationError;
use crate::storage::StoreError;

/// Errors returned by the entity services.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A guest copy stopped part-way. Guests already copied stay in place.
    #[error("copied {copied} of {total} guests from event {from_event}: {reason}")]
    PartialCopy {
        copied: usize,
        total: usize,
        from_event: String,
        reason: String,
    },
    #[error("Template rendering failed: {0}")]
    Render(String),
}

impl ServiceError {
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity_type,
            id: id.into(),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
