//! DynamoDB storage backend.
//!
//! Implements [`KeyValueStore`](eventplanner_core::storage::KeyValueStore) on
//! top of `aws-sdk-dynamodb`. Attribute names and the owner index come from
//! [`StoreConfig`](eventplanner_core::storage::StoreConfig), so the same code
//! serves local and AWS tables.

mod conversions;
mod error;
mod store;

pub use store::{AwsConfig, DynamoDbStore};
