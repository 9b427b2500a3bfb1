//! Table configuration types (Functional Core - pure data).

use eventplanner_core::storage::StoreConfig;

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: KeyAttribute,
    pub gsis: Vec<GsiConfig>,
}

/// A string key attribute. Every key in the events table is a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
}

impl KeyAttribute {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Global Secondary Index configuration. Projection is always ALL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GsiConfig {
    pub name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: Option<KeyAttribute>,
}

impl TableConfig {
    /// Names of the table's own key attributes, partition key first.
    pub fn key_names(&self) -> (&str, &str) {
        (&self.partition_key.name, &self.sort_key.name)
    }
}

/// Returns the events table schema for a store layout.
///
/// The owner index is keyed on the sort-key attribute so that
/// `OWNER-<EMAIL>` items can be queried across partitions; its range key is
/// the event id.
pub fn events_table_config(store: &StoreConfig) -> TableConfig {
    TableConfig {
        table_name: store.table_name.clone(),
        partition_key: KeyAttribute::new(&store.partition_key),
        sort_key: KeyAttribute::new(&store.sort_key),
        gsis: vec![GsiConfig {
            name: store.owner_index.clone(),
            partition_key: KeyAttribute::new(&store.sort_key),
            sort_key: Some(KeyAttribute::new(&store.partition_key)),
        }],
    }
}
