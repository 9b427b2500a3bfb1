//! Contracts for the pending-task notification batch.

mod error;
mod report;
mod traits;

pub use error::NotificationError;
pub use report::{DeliveryFailure, NotificationReport};
pub use traits::{NotificationSender, RenderedMessage, TemplateRenderer};
