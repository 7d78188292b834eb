//! Repository for the gallery record list (most recent first).

use wallmania_core::record::GenerationRecord;

use super::{load_json, load_json_strict, save_json, GALLERY_KEY};
use crate::kv::{KeyValueStore, StoreError};

/// Provides access to the ordered list of generation records.
pub struct GalleryRepo;

impl GalleryRepo {
    /// All records, most recent first. Empty when nothing is stored.
    pub async fn list(store: &dyn KeyValueStore) -> Result<Vec<GenerationRecord>, StoreError> {
        Ok(load_json(store, GALLERY_KEY).await?.unwrap_or_default())
    }

    /// Find a record by id.
    pub async fn find_by_id(
        store: &dyn KeyValueStore,
        id: &str,
    ) -> Result<Option<GenerationRecord>, StoreError> {
        Ok(Self::list(store).await?.into_iter().find(|r| r.id == id))
    }

    /// Insert `record` at the head of the list.
    ///
    /// Fails with [`StoreError::Malformed`] if the stored list cannot be
    /// decoded; the stored value is left untouched.
    pub async fn prepend(
        store: &dyn KeyValueStore,
        record: &GenerationRecord,
    ) -> Result<(), StoreError> {
        let mut records: Vec<GenerationRecord> =
            load_json_strict(store, GALLERY_KEY).await?.unwrap_or_default();
        records.insert(0, record.clone());
        save_json(store, GALLERY_KEY, &records).await
    }
}
