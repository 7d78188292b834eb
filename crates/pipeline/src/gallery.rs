//! Local gallery of generated wallpapers with a favorites overlay.

use std::collections::HashSet;
use std::sync::Arc;

use wallmania_core::record::GenerationRecord;
use wallmania_core::types::Orientation;
use wallmania_db::repositories::{FavoritesRepo, GalleryRepo};
use wallmania_db::{KeyValueStore, StoreError};

/// Criteria for [`Gallery::list`]. The default matches everything.
#[derive(Debug, Clone, Default)]
pub struct GalleryFilter {
    pub favorites_only: bool,
    /// Case-insensitive substring match against the prompt.
    pub search_text: Option<String>,
    pub orientation: Option<Orientation>,
}

impl GalleryFilter {
    fn matches(&self, record: &GenerationRecord, needle: Option<&str>) -> bool {
        if self.favorites_only && !record.is_favorite {
            return false;
        }
        if let Some(orientation) = self.orientation {
            if record.orientation != orientation {
                return false;
            }
        }
        match needle {
            Some(needle) => record.prompt.to_lowercase().contains(needle),
            None => true,
        }
    }
}

#[derive(Clone)]
pub struct Gallery {
    store: Arc<dyn KeyValueStore>,
}

impl Gallery {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Records matching `filter`, most recent first, with `is_favorite`
    /// taken from the favorites set.
    pub async fn list(&self, filter: &GalleryFilter) -> Result<Vec<GenerationRecord>, StoreError> {
        let records = GalleryRepo::list(self.store.as_ref()).await?;
        let favorites: HashSet<String> = FavoritesRepo::list(self.store.as_ref())
            .await?
            .into_iter()
            .collect();

        let needle = filter
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(records
            .into_iter()
            .map(|mut record| {
                record.is_favorite = favorites.contains(&record.id);
                record
            })
            .filter(|record| filter.matches(record, needle.as_deref()))
            .collect())
    }

    /// Prepend a new record.
    pub async fn add(&self, record: &GenerationRecord) -> Result<(), StoreError> {
        GalleryRepo::prepend(self.store.as_ref(), record).await?;
        tracing::info!(record_id = %record.id, media_kind = ?record.media_kind, "Saved to gallery");
        Ok(())
    }

    /// A single record by id, with its favorite flag applied.
    pub async fn get(&self, id: &str) -> Result<Option<GenerationRecord>, StoreError> {
        let Some(mut record) = GalleryRepo::find_by_id(self.store.as_ref(), id).await? else {
            return Ok(None);
        };
        let favorites = FavoritesRepo::list(self.store.as_ref()).await?;
        record.is_favorite = favorites.iter().any(|f| f == id);
        Ok(Some(record))
    }

    /// Flip the favorite flag of `id`. Returns the new state, or `None`
    /// when no such record exists.
    pub async fn toggle_favorite(&self, id: &str) -> Result<Option<bool>, StoreError> {
        if GalleryRepo::find_by_id(self.store.as_ref(), id).await?.is_none() {
            return Ok(None);
        }
        let now_favorite = FavoritesRepo::toggle(self.store.as_ref(), id).await?;
        tracing::debug!(record_id = id, favorite = now_favorite, "Toggled favorite");
        Ok(Some(now_favorite))
    }
}
