//! Pure functions for mapping service errors to HTTP status codes.
//!
//! Request decoding and routing live outside this workspace; whatever adapter
//! sits in front of the services uses these mappings to answer callers.

use super::ServiceError;
use crate::storage::StoreError;

/// Maps a [`StoreError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `InvalidData` -> 400 (Bad Request)
/// - everything else -> 500 (Internal Server Error)
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::ConnectionFailed(_) => 503,
        StoreError::InvalidData(_) => 400,
        StoreError::QueryFailed(_)
        | StoreError::Serialization(_)
        | StoreError::TransactionTooLarge { .. }
        | StoreError::TransactionCanceled(_) => 500,
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// # Examples
///
/// ```
/// use eventplanner_core::service::{service_error_to_status_code, ServiceError};
///
/// assert_eq!(service_error_to_status_code(&ServiceError::Unauthorized), 403);
/// ```
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Validation(_) => 400,
        ServiceError::Unauthorized => 403,
        ServiceError::NotFound { .. } => 404,
        ServiceError::Store(store) => store_error_to_status_code(store),
        ServiceError::PartialCopy { .. } => 500,
        ServiceError::Render(_) => 500,
    }
}
