//! Repository for the premium entitlement.

use wallmania_core::quota::Entitlement;

use super::{load_json, save_json, ENTITLEMENT_KEY};
use crate::kv::{KeyValueStore, StoreError};

pub struct EntitlementRepo;

impl EntitlementRepo {
    /// Current entitlement; non-premium when nothing is stored.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Entitlement, StoreError> {
        Ok(load_json(store, ENTITLEMENT_KEY).await?.unwrap_or_default())
    }

    pub async fn save(
        store: &dyn KeyValueStore,
        entitlement: &Entitlement,
    ) -> Result<(), StoreError> {
        save_json(store, ENTITLEMENT_KEY, entitlement).await
    }
}
