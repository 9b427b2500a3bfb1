//! DynamoDB store implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Delete, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;

use eventplanner_core::storage::{
    ItemKey, KeyCondition, KeyValueStore, Record, Result, StoreConfig, StoreError, WriteOp,
    MAX_TRANSACTION_ITEMS,
};

use super::conversions::{item_to_record, key_to_item, record_to_item, Item};
use super::error::{
    map_build_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_query_error, map_scan_error, map_transact_write_error,
};

/// AWS client configuration.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: "us-east-1".to_string(),
        }
    }
}

/// DynamoDB-backed key-value store over the single events table.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
    config: StoreConfig,
    closed: Arc<AtomicBool>,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client and table layout.
    pub fn new(client: Client, config: StoreConfig) -> Self {
        Self {
            client,
            config,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a store using the AWS SDK default credential chain.
    pub async fn connect(aws: &AwsConfig, config: StoreConfig) -> Self {
        let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(aws.region.clone()));

        if let Some(endpoint) = &aws.endpoint_url {
            sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
        }

        let sdk_config = sdk_config_loader.load().await;
        tracing::info!(
            table = %config.table_name,
            region = %aws.region,
            endpoint = ?aws.endpoint_url,
            "connected DynamoDB store"
        );
        Self::new(Client::new(&sdk_config), config)
    }

    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::ConnectionFailed("store is closed".to_string()));
        }
        Ok(())
    }

    fn records(&self, items: Vec<Item>) -> Result<Vec<Record>> {
        items
            .iter()
            .map(|item| item_to_record(item, &self.config))
            .collect()
    }

    fn transact_item(&self, op: WriteOp) -> Result<TransactWriteItem> {
        let item = match op {
            WriteOp::Put(record) => {
                let put = Put::builder()
                    .table_name(&self.config.table_name)
                    .set_item(Some(record_to_item(&record, &self.config)))
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().put(put).build()
            }
            WriteOp::Delete(key) => {
                let delete = Delete::builder()
                    .table_name(&self.config.table_name)
                    .set_key(Some(key_to_item(&key, &self.config)))
                    .build()
                    .map_err(map_build_error)?;
                TransactWriteItem::builder().delete(delete).build()
            }
        };
        Ok(item)
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Record>> {
        self.ensure_open()?;
        let result = self
            .client
            .get_item()
            .table_name(&self.config.table_name)
            .set_key(Some(key_to_item(key, &self.config)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_record(&item, &self.config)?)),
            None => Ok(None),
        }
    }

    async fn put_item(&self, record: Record) -> Result<()> {
        self.ensure_open()?;
        let kind = record.key.kind().map(|k| k.as_str()).unwrap_or("Item");
        let item = record_to_item(&record, &self.config);

        self.client
            .put_item()
            .table_name(&self.config.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, kind))?;

        Ok(())
    }

    async fn delete_item(&self, key: &ItemKey) -> Result<()> {
        self.ensure_open()?;
        let kind = key.kind().map(|k| k.as_str()).unwrap_or("Item");

        self.client
            .delete_item()
            .table_name(&self.config.table_name)
            .set_key(Some(key_to_item(key, &self.config)))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, kind))?;

        Ok(())
    }

    async fn query(&self, condition: &KeyCondition) -> Result<Vec<Record>> {
        self.ensure_open()?;
        let request = self
            .client
            .query()
            .table_name(&self.config.table_name);

        // Every placeholder must be used by the expression.
        let request = match condition {
            KeyCondition::Partition(partition) => request
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", &self.config.partition_key)
                .expression_attribute_values(":pk", AttributeValue::S(partition.clone())),
            KeyCondition::PartitionWithPrefix { partition, prefix } => request
                .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
                .expression_attribute_names("#pk", &self.config.partition_key)
                .expression_attribute_names("#sk", &self.config.sort_key)
                .expression_attribute_values(":pk", AttributeValue::S(partition.clone()))
                .expression_attribute_values(":prefix", AttributeValue::S(prefix.clone())),
            KeyCondition::OwnerIndex(sort) => request
                .index_name(&self.config.owner_index)
                .key_condition_expression("#sk = :sk")
                .expression_attribute_names("#sk", &self.config.sort_key)
                .expression_attribute_values(":sk", AttributeValue::S(sort.clone())),
        };

        let items = request
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(map_query_error)?;

        tracing::debug!(?condition, count = items.len(), "query");
        self.records(items)
    }

    async fn scan(&self, sort_key_prefix: &str) -> Result<Vec<Record>> {
        self.ensure_open()?;
        let items = self
            .client
            .scan()
            .table_name(&self.config.table_name)
            .filter_expression("begins_with(#sk, :prefix)")
            .expression_attribute_names("#sk", &self.config.sort_key)
            .expression_attribute_values(":prefix", AttributeValue::S(sort_key_prefix.to_string()))
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(map_scan_error)?;

        tracing::debug!(prefix = sort_key_prefix, count = items.len(), "scan");
        self.records(items)
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.ensure_open()?;
        if ops.len() > MAX_TRANSACTION_ITEMS {
            return Err(StoreError::TransactionTooLarge {
                count: ops.len(),
                max: MAX_TRANSACTION_ITEMS,
            });
        }

        let items = ops
            .into_iter()
            .map(|op| self.transact_item(op))
            .collect::<Result<Vec<_>>>()?;

        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await
            .map_err(map_transact_write_error)?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        tracing::debug!(table = %self.config.table_name, "DynamoDB store closed");
        Ok(())
    }
}
