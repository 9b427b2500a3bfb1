mod config;
mod error;
pub mod keys;
mod traits;
mod types;

pub use config::{
    SortKeyMode, StoreConfig, DEFAULT_OWNER_INDEX, DEFAULT_PARTITION_KEY, DEFAULT_SORT_KEY,
    DEFAULT_TABLE_NAME,
};
pub use error::{Result, StoreError};
pub use keys::ItemKind;
pub use traits::KeyValueStore;
pub use types::{Attributes, ItemKey, KeyCondition, Record, WriteOp, MAX_TRANSACTION_ITEMS};
