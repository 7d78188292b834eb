//! Repository for the favorite record id set.

use super::{load_json, load_json_strict, save_json, FAVORITES_KEY};
use crate::kv::{KeyValueStore, StoreError};

/// Stores favorite record ids as a JSON array, in the order they were
/// favorited.
pub struct FavoritesRepo;

impl FavoritesRepo {
    pub async fn list(store: &dyn KeyValueStore) -> Result<Vec<String>, StoreError> {
        Ok(load_json(store, FAVORITES_KEY).await?.unwrap_or_default())
    }

    /// Flip membership of `id`. Returns `true` if `id` is now a favorite.
    /// A malformed stored set is an error and is not overwritten.
    pub async fn toggle(store: &dyn KeyValueStore, id: &str) -> Result<bool, StoreError> {
        let mut ids: Vec<String> = load_json_strict(store, FAVORITES_KEY).await?.unwrap_or_default();
        let now_favorite = match ids.iter().position(|f| f == id) {
            Some(pos) => {
                ids.remove(pos);
                false
            }
            None => {
                ids.push(id.to_string());
                true
            }
        };
        save_json(store, FAVORITES_KEY, &ids).await?;
        Ok(now_favorite)
    }
}
