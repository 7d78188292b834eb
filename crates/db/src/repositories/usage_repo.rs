//! Repository for the daily usage record.

use wallmania_core::quota::UsageRecord;

use super::{load_json, save_json, USAGE_KEY};
use crate::kv::{KeyValueStore, StoreError};

/// Reads and writes the single live [`UsageRecord`].
pub struct UsageRepo;

impl UsageRepo {
    /// Load the stored record, whatever day it belongs to.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<UsageRecord>, StoreError> {
        load_json(store, USAGE_KEY).await
    }

    /// Replace the stored record.
    pub async fn save(store: &dyn KeyValueStore, usage: &UsageRecord) -> Result<(), StoreError> {
        save_json(store, USAGE_KEY, usage).await
    }
}
