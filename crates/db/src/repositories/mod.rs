//! Typed repositories over the key-value store.
//!
//! Each repository owns one fixed storage key and its JSON shape.
//! On reads, a value that fails to parse is logged and treated as
//! absent, so a corrupted entry degrades to the default state. Appends
//! to a collection load strictly instead: they fail rather than write
//! over data they could not read.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kv::{KeyValueStore, StoreError};

pub mod entitlement_repo;
pub mod favorites_repo;
pub mod gallery_repo;
pub mod usage_repo;

pub use entitlement_repo::EntitlementRepo;
pub use favorites_repo::FavoritesRepo;
pub use gallery_repo::GalleryRepo;
pub use usage_repo::UsageRepo;

/// Storage key for the gallery record list.
pub const GALLERY_KEY: &str = "wallpapers";
/// Storage key for the favorite record id set.
pub const FAVORITES_KEY: &str = "favorites";
/// Storage key for today's usage counters.
pub const USAGE_KEY: &str = "wallpaper_token_usage";
/// Storage key for the premium entitlement.
pub const ENTITLEMENT_KEY: &str = "wallpaper_premium";

/// Read and decode the JSON value under `key`.
///
/// Returns `Ok(None)` when the key is missing or holds malformed JSON.
async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
) -> Result<Option<T>, StoreError> {
    match load_json_strict(store, key).await {
        Err(StoreError::Malformed { key, source }) => {
            tracing::warn!(key, error = %source, "Malformed stored value, falling back to default");
            Ok(None)
        }
        other => other,
    }
}

/// Like [`load_json`], but malformed JSON is [`StoreError::Malformed`].
/// Used before read-modify-write so a bad value is never replaced.
async fn load_json_strict<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &'static str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Malformed { key, source })
}

/// Encode `value` as JSON and write it under `key`.
async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &'static str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode { key, source })?;
    store.put(key, &raw).await
}
