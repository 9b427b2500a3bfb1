use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::keys::ItemKind;
use super::StoreError;

/// Largest number of items a single transactional write may touch.
pub const MAX_TRANSACTION_ITEMS: usize = 100;

/// Non-key attributes of a stored item.
pub type Attributes = Map<String, Value>;

/// Primary key of an item: partition (event id) and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition: String,
    pub sort: String,
}

impl ItemKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }

    /// Kind encoded in the sort key, if it carries a known prefix.
    pub fn kind(&self) -> Option<ItemKind> {
        ItemKind::from_sort_key(&self.sort)
    }
}

/// A stored item: its key plus the serialized entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: ItemKey,
    pub attributes: Attributes,
}

impl Record {
    pub fn new(key: ItemKey, attributes: Attributes) -> Self {
        Self { key, attributes }
    }

    /// Serializes `entity` into a record stored under `key`.
    pub fn from_entity<T: Serialize>(key: ItemKey, entity: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(entity) {
            Ok(Value::Object(attributes)) => Ok(Self { key, attributes }),
            Ok(other) => Err(StoreError::Serialization(format!(
                "expected an object for {}, got {other}",
                key.sort
            ))),
            Err(e) => Err(StoreError::Serialization(e.to_string())),
        }
    }

    /// Deserializes the attributes back into an entity.
    pub fn to_entity<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Which items a query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCondition {
    /// Every item of a partition.
    Partition(String),
    /// Items of a partition whose sort key begins with `prefix`.
    PartitionWithPrefix { partition: String, prefix: String },
    /// Items across all partitions whose sort key equals the value, served by
    /// the owner index.
    OwnerIndex(String),
}

impl KeyCondition {
    pub fn matches(&self, key: &ItemKey) -> bool {
        match self {
            KeyCondition::Partition(partition) => key.partition == *partition,
            KeyCondition::PartitionWithPrefix { partition, prefix } => {
                key.partition == *partition && key.sort.starts_with(prefix.as_str())
            }
            KeyCondition::OwnerIndex(sort) => key.sort == *sort,
        }
    }
}

/// One operation of a transactional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Put(Record),
    Delete(ItemKey),
}

impl WriteOp {
    pub fn key(&self) -> &ItemKey {
        match self {
            WriteOp::Put(record) => &record.key,
            WriteOp::Delete(key) => key,
        }
    }
}
