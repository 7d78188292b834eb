//! Persistent daily quota tracking.

use std::sync::Arc;

use wallmania_core::clock::Clock;
use wallmania_core::quota::{Allowance, QuotaLimits, UsageRecord, UsageStats};
use wallmania_db::repositories::UsageRepo;
use wallmania_db::{KeyValueStore, StoreError};

/// Daily free-tier accounting over the key-value store.
///
/// Every method takes `is_premium`; premium callers are answered without
/// reading or writing storage. Spends are read-modify-write with no
/// locking, so two processes sharing a store can double-spend.
#[derive(Clone)]
pub struct QuotaTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    limits: QuotaLimits,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, limits: QuotaLimits) -> Self {
        Self {
            store,
            clock,
            limits,
        }
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    pub async fn remaining_tokens(&self, is_premium: bool) -> Result<Allowance, StoreError> {
        if is_premium {
            return Ok(Allowance::Unlimited);
        }
        let usage = self.today().await?;
        Ok(Allowance::Limited(usage.remaining_tokens(&self.limits)))
    }

    pub async fn remaining_downloads(&self, is_premium: bool) -> Result<Allowance, StoreError> {
        if is_premium {
            return Ok(Allowance::Unlimited);
        }
        let usage = self.today().await?;
        Ok(Allowance::Limited(usage.remaining_downloads(&self.limits)))
    }

    pub async fn can_generate_image(&self, is_premium: bool) -> Result<bool, StoreError> {
        if is_premium {
            return Ok(true);
        }
        Ok(self.today().await?.can_generate_image(&self.limits))
    }

    pub async fn can_download(&self, is_premium: bool) -> Result<bool, StoreError> {
        if is_premium {
            return Ok(true);
        }
        Ok(self.today().await?.can_download(&self.limits))
    }

    /// Spend one image's worth of tokens.
    ///
    /// Returns `false`, with no side effect, when today's allowance is
    /// insufficient.
    pub async fn consume_for_image(&self, is_premium: bool) -> Result<bool, StoreError> {
        if is_premium {
            return Ok(true);
        }
        let mut usage = self.today().await?;
        if !usage.record_image(&self.limits) {
            tracing::info!(
                tokens_used = usage.tokens_used,
                "Image quota exhausted for today",
            );
            return Ok(false);
        }
        UsageRepo::save(self.store.as_ref(), &usage).await?;
        tracing::debug!(
            tokens_used = usage.tokens_used,
            images_generated = usage.images_generated,
            "Consumed image tokens",
        );
        Ok(true)
    }

    /// Spend one download.
    pub async fn consume_for_download(&self, is_premium: bool) -> Result<bool, StoreError> {
        if is_premium {
            return Ok(true);
        }
        let mut usage = self.today().await?;
        if !usage.record_download(&self.limits) {
            tracing::info!(
                downloads_used = usage.downloads_used,
                "Download quota exhausted for today",
            );
            return Ok(false);
        }
        UsageRepo::save(self.store.as_ref(), &usage).await?;
        tracing::debug!(downloads_used = usage.downloads_used, "Consumed download");
        Ok(true)
    }

    pub async fn usage_stats(&self, is_premium: bool) -> Result<UsageStats, StoreError> {
        let usage = if is_premium {
            // Report the stored counters without rolling them over.
            UsageRecord::for_day(UsageRepo::load(self.store.as_ref()).await?, self.clock.today())
        } else {
            self.today().await?
        };
        Ok(UsageStats::from_usage(&usage, &self.limits, is_premium))
    }

    /// Today's usage record. A missing or stale record is replaced by a
    /// zeroed one for today and persisted.
    async fn today(&self) -> Result<UsageRecord, StoreError> {
        let today = self.clock.today();
        let stored = UsageRepo::load(self.store.as_ref()).await?;
        match stored {
            Some(usage) if usage.day_key == today => Ok(usage),
            stale => {
                if let Some(old) = &stale {
                    tracing::info!(
                        previous_day = %old.day_key,
                        day = %today,
                        "Daily usage rolled over",
                    );
                }
                let fresh = UsageRecord::fresh(today);
                UsageRepo::save(self.store.as_ref(), &fresh).await?;
                Ok(fresh)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use wallmania_core::clock::FixedClock;
    use wallmania_core::quota::DEFAULT_DAILY_TOKEN_LIMIT;
    use wallmania_db::repositories::USAGE_KEY;
    use wallmania_db::MemoryKvStore;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn tracker() -> (QuotaTracker, Arc<MemoryKvStore>, Arc<FixedClock>) {
        let store = Arc::new(MemoryKvStore::new());
        let clock = Arc::new(FixedClock::new(day(19)));
        let tracker = QuotaTracker::new(store.clone(), clock.clone(), QuotaLimits::default());
        (tracker, store, clock)
    }

    #[tokio::test]
    async fn fresh_day_has_full_allowance() {
        let (quota, _, _) = tracker();
        assert_eq!(
            quota.remaining_tokens(false).await.unwrap(),
            Allowance::Limited(DEFAULT_DAILY_TOKEN_LIMIT)
        );
        assert_eq!(quota.remaining_downloads(false).await.unwrap(), Allowance::Limited(5));
    }

    #[tokio::test]
    async fn eleventh_image_is_refused() {
        let (quota, store, _) = tracker();
        for _ in 0..10 {
            assert!(quota.consume_for_image(false).await.unwrap());
        }
        let before = store.get(USAGE_KEY).await.unwrap();

        assert!(!quota.consume_for_image(false).await.unwrap());
        assert!(!quota.can_generate_image(false).await.unwrap());
        assert_eq!(store.get(USAGE_KEY).await.unwrap(), before);
        assert_eq!(quota.remaining_tokens(false).await.unwrap(), Allowance::Limited(0));
    }

    #[tokio::test]
    async fn rollover_resets_counters() {
        let (quota, _, clock) = tracker();
        for _ in 0..3 {
            quota.consume_for_image(false).await.unwrap();
            quota.consume_for_download(false).await.unwrap();
        }
        assert_eq!(quota.remaining_tokens(false).await.unwrap(), Allowance::Limited(350));

        clock.set(day(20));
        assert_eq!(quota.remaining_tokens(false).await.unwrap(), Allowance::Limited(500));
        assert_eq!(quota.remaining_downloads(false).await.unwrap(), Allowance::Limited(5));
        let stats = quota.usage_stats(false).await.unwrap();
        assert_eq!(stats.images_generated, 0);
    }

    #[tokio::test]
    async fn premium_never_touches_storage() {
        let (quota, store, _) = tracker();
        for _ in 0..20 {
            assert!(quota.can_download(true).await.unwrap());
            assert!(quota.consume_for_download(true).await.unwrap());
            assert!(quota.consume_for_image(true).await.unwrap());
        }
        assert!(store.is_empty().await);
        assert_eq!(quota.remaining_tokens(true).await.unwrap(), Allowance::Unlimited);
    }

    #[tokio::test]
    async fn premium_stats_are_unlimited() {
        let (quota, _, _) = tracker();
        quota.consume_for_image(false).await.unwrap();
        let stats = quota.usage_stats(true).await.unwrap();
        assert!(stats.is_premium);
        assert_eq!(stats.tokens_remaining, Allowance::Unlimited);
        assert_eq!(stats.images_generated, 1);
    }

    #[tokio::test]
    async fn malformed_usage_reads_as_fresh_day() {
        let (quota, store, _) = tracker();
        store.put(USAGE_KEY, "not json").await.unwrap();
        assert_eq!(quota.remaining_tokens(false).await.unwrap(), Allowance::Limited(500));
        assert!(quota.consume_for_image(false).await.unwrap());
        assert_eq!(quota.remaining_tokens(false).await.unwrap(), Allowance::Limited(450));
    }
}
