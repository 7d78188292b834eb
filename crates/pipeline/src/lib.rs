//! Service layer: quota accounting, the gallery, generation
//! orchestration, and delivery of finished assets.
//!
//! Every service holds an `Arc<dyn KeyValueStore>` (and, where the day
//! matters, an `Arc<dyn Clock>`), so tests swap in `MemoryKvStore` and
//! `FixedClock` without touching the logic.

pub mod context;
pub mod delivery;
pub mod entitlements;
pub mod error;
pub mod gallery;
pub mod generation;
pub mod quota;
pub mod surface;

pub use context::{AppContext, ContextOptions};
pub use delivery::{DeliveryService, DownloadOutcome, WallpaperOutcome};
pub use entitlements::Entitlements;
pub use error::PipelineError;
pub use gallery::{Gallery, GalleryFilter};
pub use generation::{GenerationService, ImageOutcome, VideoOutcome};
pub use quota::QuotaTracker;
pub use surface::{HeadlessSurface, NativeSurface, ShareRequest, SurfaceError};
