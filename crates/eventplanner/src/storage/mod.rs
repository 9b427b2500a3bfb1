//! Key-value store backends.
//!
//! Backends implement [`KeyValueStore`](eventplanner_core::storage::KeyValueStore)
//! and are selected at compile time via feature flags:
//!
//! - `inmemory` (default): ordered map behind a lock, no persistence
//! - `dynamodb`: AWS DynamoDB through `aws-sdk-dynamodb`
//!
//! Both may be enabled at once; the binary picks one at start-up.
//!
//! ```bash
//! cargo build -p eventplanner --no-default-features --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p eventplanner --features dynamodb"
);

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(test, feature = "inmemory"))]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
