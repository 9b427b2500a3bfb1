//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and store
//! records. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use eventplanner_core::storage::{Attributes, ItemKey, Record, StoreConfig, StoreError};
use serde_json::{Number, Value};

pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value to an AttributeValue.
pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert an AttributeValue to a JSON value.
///
/// Set and binary types are never written by this crate and are rejected.
pub fn attribute_to_json(value: &AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => n
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| StoreError::InvalidData(format!("Invalid number: {}", n))),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => map
            .iter()
            .map(|(k, v)| attribute_to_json(v).map(|v| (k.clone(), v)))
            .collect::<Result<Attributes, _>>()
            .map(Value::Object),
        other => Err(StoreError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Build the key map for an item.
pub fn key_to_item(key: &ItemKey, config: &StoreConfig) -> Item {
    let mut item = HashMap::with_capacity(2);
    item.insert(
        config.partition_key.clone(),
        AttributeValue::S(key.partition.clone()),
    );
    item.insert(config.sort_key.clone(), AttributeValue::S(key.sort.clone()));
    item
}

/// Convert a record to a DynamoDB item.
///
/// Key attributes are written last, so they win over entity fields of the
/// same name.
pub fn record_to_item(record: &Record, config: &StoreConfig) -> Item {
    let mut item: Item = record
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), json_to_attribute(v)))
        .collect();
    item.extend(key_to_item(&record.key, config));
    item
}

/// Convert a DynamoDB item to a record, moving the key attributes into the key.
pub fn item_to_record(item: &Item, config: &StoreConfig) -> Result<Record, StoreError> {
    let key = ItemKey::new(
        get_string(item, &config.partition_key)?,
        get_string(item, &config.sort_key)?,
    );

    let attributes = item
        .iter()
        .filter(|(k, _)| **k != config.partition_key && **k != config.sort_key)
        .map(|(k, v)| attribute_to_json(v).map(|v| (k.clone(), v)))
        .collect::<Result<Attributes, _>>()?;

    Ok(Record::new(key, attributes))
}

fn get_string(item: &Item, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid field: {}", key)))
}
