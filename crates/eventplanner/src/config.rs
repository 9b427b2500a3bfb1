use std::env;

use eventplanner_core::storage::{
    SortKeyMode, StoreConfig, DEFAULT_OWNER_INDEX, DEFAULT_PARTITION_KEY, DEFAULT_SORT_KEY,
    DEFAULT_TABLE_NAME,
};

use crate::services::DEFAULT_NOTIFICATION_CONCURRENCY;

const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Events table name (default: "events")
    pub table_name: String,
    /// Partition key attribute (default: "id")
    pub partition_key: String,
    /// Sort key attribute (default: "entityType")
    pub sort_key: String,
    /// Owner index name (default: "ownerIdx")
    pub owner_index: String,
    /// How child items are keyed (default: prefixed)
    pub sort_key_mode: SortKeyMode,
    /// Deliveries in flight during the notification batch (default: 4)
    pub notification_concurrency: usize,
    /// Custom DynamoDB endpoint, e.g. a local container.
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub aws_endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    #[allow(dead_code)]
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EVENTS_TABLE_NAME` - Table name (default: "events")
    /// - `EVENTS_PARTITION_KEY` - Partition key attribute (default: "id")
    /// - `EVENTS_SORT_KEY` - Sort key attribute (default: "entityType")
    /// - `EVENTS_OWNER_INDEX` - Owner index name (default: "ownerIdx")
    /// - `EVENTS_SORT_KEY_MODE` - `prefixed` or `legacy` (default: "prefixed")
    /// - `NOTIFICATION_CONCURRENCY` - Concurrent deliveries (default: 4)
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let sort_key_mode = match lookup("EVENTS_SORT_KEY_MODE") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %value, error = %e, "invalid EVENTS_SORT_KEY_MODE, using default");
                SortKeyMode::default()
            }),
            None => SortKeyMode::default(),
        };

        let notification_concurrency = lookup("NOTIFICATION_CONCURRENCY")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_NOTIFICATION_CONCURRENCY);

        Self {
            table_name: string_or("EVENTS_TABLE_NAME", DEFAULT_TABLE_NAME),
            partition_key: string_or("EVENTS_PARTITION_KEY", DEFAULT_PARTITION_KEY),
            sort_key: string_or("EVENTS_SORT_KEY", DEFAULT_SORT_KEY),
            owner_index: string_or("EVENTS_OWNER_INDEX", DEFAULT_OWNER_INDEX),
            sort_key_mode,
            notification_concurrency,
            aws_endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|v| !v.is_empty()),
            aws_region: string_or("AWS_REGION", DEFAULT_AWS_REGION),
        }
    }

    /// Table layout handed to the stores and services.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_table_name(&self.table_name)
            .with_key_names(&self.partition_key, &self.sort_key)
            .with_owner_index(&self.owner_index)
            .with_sort_key_mode(self.sort_key_mode)
    }

    #[cfg(feature = "dynamodb")]
    pub fn aws_config(&self) -> crate::storage::dynamodb::AwsConfig {
        crate::storage::dynamodb::AwsConfig {
            endpoint_url: self.aws_endpoint_url.clone(),
            region: self.aws_region.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
