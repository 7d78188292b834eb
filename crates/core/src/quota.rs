//! Daily free-tier allowance arithmetic.
//!
//! A [`UsageRecord`] holds one calendar day of consumption. Everything
//! here is pure; persistence and the premium bypass live in the
//! pipeline's `QuotaTracker`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Tokens granted to a free user per calendar day.
pub const DEFAULT_DAILY_TOKEN_LIMIT: u32 = 500;
/// Tokens spent per generated image (10 images/day by default).
pub const DEFAULT_TOKENS_PER_IMAGE: u32 = 50;
/// Downloads granted to a free user per calendar day.
pub const DEFAULT_DAILY_DOWNLOAD_LIMIT: u32 = 5;

/// Configurable free-tier limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub daily_tokens: u32,
    pub tokens_per_image: u32,
    pub daily_downloads: u32,
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self {
            daily_tokens: DEFAULT_DAILY_TOKEN_LIMIT,
            tokens_per_image: DEFAULT_TOKENS_PER_IMAGE,
            daily_downloads: DEFAULT_DAILY_DOWNLOAD_LIMIT,
        }
    }
}

impl QuotaLimits {
    /// Number of images a free user can generate in one day.
    pub fn images_per_day(&self) -> u32 {
        if self.tokens_per_image == 0 {
            return u32::MAX;
        }
        self.daily_tokens / self.tokens_per_image
    }
}

// ---------------------------------------------------------------------------
// Allowance
// ---------------------------------------------------------------------------

/// Remaining allowance: a bounded count, or unbounded for premium users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Allowance {
    Unlimited,
    Limited(u32),
}

impl Allowance {
    /// `true` when at least `amount` units remain.
    pub fn covers(self, amount: u32) -> bool {
        match self {
            Allowance::Unlimited => true,
            Allowance::Limited(n) => n >= amount,
        }
    }
}

impl std::fmt::Display for Allowance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Allowance::Unlimited => f.write_str("unlimited"),
            Allowance::Limited(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Usage record
// ---------------------------------------------------------------------------

/// Consumption counters for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// Local calendar date this record belongs to (`YYYY-MM-DD`).
    #[serde(rename = "date")]
    pub day_key: NaiveDate,
    pub tokens_used: u32,
    pub images_generated: u32,
    pub downloads_used: u32,
}

impl UsageRecord {
    /// Zeroed record for `day`.
    pub fn fresh(day: NaiveDate) -> Self {
        Self {
            day_key: day,
            tokens_used: 0,
            images_generated: 0,
            downloads_used: 0,
        }
    }

    /// Return `self` if it belongs to `today`, otherwise a zeroed record
    /// for `today`. The previous day's counters are discarded.
    pub fn for_day(stored: Option<Self>, today: NaiveDate) -> Self {
        match stored {
            Some(record) if record.day_key == today => record,
            _ => Self::fresh(today),
        }
    }

    pub fn remaining_tokens(&self, limits: &QuotaLimits) -> u32 {
        limits.daily_tokens.saturating_sub(self.tokens_used)
    }

    pub fn remaining_downloads(&self, limits: &QuotaLimits) -> u32 {
        limits.daily_downloads.saturating_sub(self.downloads_used)
    }

    pub fn can_generate_image(&self, limits: &QuotaLimits) -> bool {
        self.remaining_tokens(limits) >= limits.tokens_per_image
    }

    pub fn can_download(&self, limits: &QuotaLimits) -> bool {
        self.remaining_downloads(limits) > 0
    }

    /// Spend the tokens for one image. Returns `false` and leaves the
    /// record untouched when the allowance is insufficient.
    pub fn record_image(&mut self, limits: &QuotaLimits) -> bool {
        if !self.can_generate_image(limits) {
            return false;
        }
        self.tokens_used += limits.tokens_per_image;
        self.images_generated += 1;
        true
    }

    /// Spend one download. Returns `false` and leaves the record
    /// untouched when no downloads remain.
    pub fn record_download(&mut self, limits: &QuotaLimits) -> bool {
        if !self.can_download(limits) {
            return false;
        }
        self.downloads_used += 1;
        true
    }
}

// ---------------------------------------------------------------------------
// Premium entitlement
// ---------------------------------------------------------------------------

/// Premium status. A premium user bypasses every quota check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub is_premium: bool,
    #[serde(default)]
    pub upgraded_at: Option<crate::types::Timestamp>,
}

// ---------------------------------------------------------------------------
// Usage stats
// ---------------------------------------------------------------------------

/// Read-only usage summary for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub tokens_used: u32,
    pub tokens_remaining: Allowance,
    pub images_generated: u32,
    pub downloads_used: u32,
    pub downloads_remaining: Allowance,
    pub is_premium: bool,
}

impl UsageStats {
    /// Summarise `usage`. Premium users report zero spend and unlimited
    /// allowances, but still see how many images they generated today.
    pub fn from_usage(usage: &UsageRecord, limits: &QuotaLimits, is_premium: bool) -> Self {
        if is_premium {
            return Self {
                tokens_used: 0,
                tokens_remaining: Allowance::Unlimited,
                images_generated: usage.images_generated,
                downloads_used: 0,
                downloads_remaining: Allowance::Unlimited,
                is_premium: true,
            };
        }
        Self {
            tokens_used: usage.tokens_used,
            tokens_remaining: Allowance::Limited(usage.remaining_tokens(limits)),
            images_generated: usage.images_generated,
            downloads_used: usage.downloads_used,
            downloads_remaining: Allowance::Limited(usage.remaining_downloads(limits)),
            is_premium: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn fresh_record_has_full_allowance() {
        let limits = QuotaLimits::default();
        for d in 1..=31 {
            let usage = UsageRecord::fresh(day(d));
            assert_eq!(usage.tokens_used, 0);
            assert_eq!(usage.downloads_used, 0);
            assert_eq!(usage.remaining_tokens(&limits), DEFAULT_DAILY_TOKEN_LIMIT);
        }
    }

    #[test]
    fn ten_images_then_refused() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        for _ in 0..limits.images_per_day() {
            assert!(usage.record_image(&limits));
        }
        let before = usage.clone();
        assert!(!usage.record_image(&limits));
        assert_eq!(usage, before);
        assert_eq!(usage.images_generated, 10);
        assert_eq!(usage.remaining_tokens(&limits), 0);
    }

    #[test]
    fn partial_tokens_do_not_buy_an_image() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        usage.tokens_used = 460;
        assert_eq!(usage.remaining_tokens(&limits), 40);
        assert!(!usage.can_generate_image(&limits));
        assert!(!usage.record_image(&limits));
        assert_eq!(usage.tokens_used, 460);
    }

    #[test]
    fn remaining_never_underflows() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        usage.tokens_used = 900;
        usage.downloads_used = 12;
        assert_eq!(usage.remaining_tokens(&limits), 0);
        assert_eq!(usage.remaining_downloads(&limits), 0);
    }

    #[test]
    fn downloads_exhaust_after_limit() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        for _ in 0..DEFAULT_DAILY_DOWNLOAD_LIMIT {
            assert!(usage.record_download(&limits));
        }
        assert!(!usage.can_download(&limits));
        assert!(!usage.record_download(&limits));
        assert_eq!(usage.downloads_used, DEFAULT_DAILY_DOWNLOAD_LIMIT);
    }

    #[test]
    fn stale_record_rolls_over_to_zero() {
        let mut yesterday = UsageRecord::fresh(day(18));
        yesterday.tokens_used = 300;
        yesterday.downloads_used = 4;
        let today = UsageRecord::for_day(Some(yesterday), day(19));
        assert_eq!(today, UsageRecord::fresh(day(19)));
    }

    #[test]
    fn same_day_record_is_kept() {
        let mut usage = UsageRecord::fresh(day(19));
        usage.tokens_used = 100;
        let kept = UsageRecord::for_day(Some(usage.clone()), day(19));
        assert_eq!(kept, usage);
    }

    #[test]
    fn record_json_uses_date_key() {
        let usage = UsageRecord::fresh(day(19));
        let json = serde_json::to_value(&usage).unwrap();
        assert_eq!(json["date"], "2026-10-19");
        assert_eq!(json["tokensUsed"], 0);
        assert_eq!(json["imagesGenerated"], 0);
        assert_eq!(json["downloadsUsed"], 0);
    }

    #[test]
    fn premium_stats_are_unlimited() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        usage.images_generated = 3;
        usage.tokens_used = 150;
        let stats = UsageStats::from_usage(&usage, &limits, true);
        assert_eq!(stats.tokens_remaining, Allowance::Unlimited);
        assert_eq!(stats.downloads_remaining, Allowance::Unlimited);
        assert_eq!(stats.tokens_used, 0);
        assert_eq!(stats.images_generated, 3);
    }

    #[test]
    fn free_stats_report_remaining() {
        let limits = QuotaLimits::default();
        let mut usage = UsageRecord::fresh(day(19));
        usage.tokens_used = 150;
        usage.downloads_used = 2;
        let stats = UsageStats::from_usage(&usage, &limits, false);
        assert_eq!(stats.tokens_remaining, Allowance::Limited(350));
        assert_eq!(stats.downloads_remaining, Allowance::Limited(3));
    }

    #[test]
    fn allowance_covers() {
        assert!(Allowance::Unlimited.covers(u32::MAX));
        assert!(Allowance::Limited(50).covers(50));
        assert!(!Allowance::Limited(49).covers(50));
    }
}
