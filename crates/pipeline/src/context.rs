//! Wiring of the services over one store and clock.

use std::path::PathBuf;
use std::sync::Arc;

use wallmania_core::clock::Clock;
use wallmania_core::quota::QuotaLimits;
use wallmania_db::KeyValueStore;
use wallmania_providers::image::ImageGenerator;
use wallmania_providers::video::VideoClient;

use crate::delivery::DeliveryService;
use crate::entitlements::Entitlements;
use crate::gallery::Gallery;
use crate::generation::GenerationService;
use crate::quota::QuotaTracker;
use crate::surface::NativeSurface;

/// Everything [`AppContext::new`] needs besides the store and clock.
pub struct ContextOptions {
    pub limits: QuotaLimits,
    pub media_dir: PathBuf,
    pub http: reqwest::Client,
    pub images: ImageGenerator,
    /// `None` when no video backend is configured.
    pub video: Option<VideoClient>,
    pub surface: Arc<dyn NativeSurface>,
}

/// The full service graph for one user.
pub struct AppContext {
    pub quota: QuotaTracker,
    pub gallery: Gallery,
    pub entitlements: Entitlements,
    pub generation: GenerationService,
    pub delivery: DeliveryService,
}

impl AppContext {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, options: ContextOptions) -> Self {
        let quota = QuotaTracker::new(store.clone(), clock.clone(), options.limits);
        let gallery = Gallery::new(store.clone());
        let entitlements = Entitlements::new(store, clock.clone());
        let generation = GenerationService::new(
            clock,
            quota.clone(),
            gallery.clone(),
            options.images,
            options.video,
            options.media_dir,
        );
        let delivery = DeliveryService::new(options.http, quota.clone(), options.surface);

        Self {
            quota,
            gallery,
            entitlements,
            generation,
            delivery,
        }
    }
}
