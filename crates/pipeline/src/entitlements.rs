//! Premium entitlement. Payment is handled elsewhere; this only records
//! the result.

use std::sync::Arc;

use wallmania_core::clock::Clock;
use wallmania_core::quota::Entitlement;
use wallmania_db::repositories::EntitlementRepo;
use wallmania_db::{KeyValueStore, StoreError};

#[derive(Clone)]
pub struct Entitlements {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl Entitlements {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn current(&self) -> Result<Entitlement, StoreError> {
        EntitlementRepo::load(self.store.as_ref()).await
    }

    pub async fn is_premium(&self) -> Result<bool, StoreError> {
        Ok(self.current().await?.is_premium)
    }

    /// Mark the user premium. Upgrading twice keeps the first timestamp.
    pub async fn upgrade(&self) -> Result<Entitlement, StoreError> {
        let current = self.current().await?;
        if current.is_premium {
            return Ok(current);
        }
        let upgraded = Entitlement {
            is_premium: true,
            upgraded_at: Some(self.clock.now()),
        };
        EntitlementRepo::save(self.store.as_ref(), &upgraded).await?;
        tracing::info!("Upgraded to premium");
        Ok(upgraded)
    }
}
