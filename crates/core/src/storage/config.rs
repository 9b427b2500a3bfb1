//! Table layout configuration shared by every store and service.

use std::fmt;
use std::str::FromStr;

use super::keys::ItemKind;

pub const DEFAULT_TABLE_NAME: &str = "events";
pub const DEFAULT_PARTITION_KEY: &str = "id";
pub const DEFAULT_SORT_KEY: &str = "entityType";
pub const DEFAULT_OWNER_INDEX: &str = "ownerIdx";

/// How child items (guests, tasks, expense categories) are keyed.
///
/// Historical data was written with the kind prefix on create and the bare id
/// on update. `Legacy` reproduces that layout for tables that still hold it;
/// `Prefixed` always writes the prefixed key and hands bare ids to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKeyMode {
    #[default]
    Prefixed,
    Legacy,
}

impl SortKeyMode {
    /// Sort key used to read or delete an existing child item by id.
    pub fn lookup_key(self, kind: ItemKind, id: &str) -> String {
        match self {
            SortKeyMode::Prefixed => kind.sort_key(id),
            SortKeyMode::Legacy => id.to_string(),
        }
    }

    /// Sort key to write a child item under, given whether it already exists.
    pub fn write_key(self, kind: ItemKind, id: &str, exists: bool) -> String {
        match self {
            SortKeyMode::Prefixed => kind.sort_key(id),
            SortKeyMode::Legacy if exists => id.to_string(),
            SortKeyMode::Legacy => format!("{}{}", kind.prefix(), id),
        }
    }

    /// Id reported to callers for an item stored under `sort_key`.
    pub fn decode_id(self, kind: ItemKind, sort_key: &str) -> String {
        match self {
            SortKeyMode::Prefixed => kind.strip(sort_key).unwrap_or(sort_key).to_string(),
            SortKeyMode::Legacy => sort_key.to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKeyMode::Prefixed => "prefixed",
            SortKeyMode::Legacy => "legacy",
        }
    }
}

impl fmt::Display for SortKeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prefixed" => Ok(SortKeyMode::Prefixed),
            "legacy" => Ok(SortKeyMode::Legacy),
            other => Err(format!("Unknown sort key mode: {other}")),
        }
    }
}

/// Names of the table, its key attributes and the owner index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub table_name: String,
    /// Attribute holding the partition key (the event id).
    pub partition_key: String,
    /// Attribute holding the sort key (the encoded item kind + id).
    pub sort_key: String,
    /// Secondary index keyed by the sort-key attribute.
    pub owner_index: String,
    pub sort_key_mode: SortKeyMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            partition_key: DEFAULT_PARTITION_KEY.to_string(),
            sort_key: DEFAULT_SORT_KEY.to_string(),
            owner_index: DEFAULT_OWNER_INDEX.to_string(),
            sort_key_mode: SortKeyMode::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    pub fn with_key_names(
        mut self,
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        self.partition_key = partition_key.into();
        self.sort_key = sort_key.into();
        self
    }

    pub fn with_owner_index(mut self, name: impl Into<String>) -> Self {
        self.owner_index = name.into();
        self
    }

    pub fn with_sort_key_mode(mut self, mode: SortKeyMode) -> Self {
        self.sort_key_mode = mode;
        self
    }
}
