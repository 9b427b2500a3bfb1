mod error;
mod http_mapping;
mod traits;

pub use error::{Result, ServiceError};
pub use http_mapping::{service_error_to_status_code, store_error_to_status_code};
pub use traits::{
    AuthorizationService, EventActionsService, EventFilter, EventService,
    ExpenseCategoryService, GuestService, TaskService,
};
