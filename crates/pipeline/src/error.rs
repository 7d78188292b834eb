use wallmania_core::error::CoreError;
use wallmania_db::StoreError;
use wallmania_providers::video::VideoError;
use wallmania_providers::ProviderError;

use crate::surface::SurfaceError;

/// Errors surfaced by the service layer.
///
/// Quota exhaustion and premium gating are *outcomes*, not errors; see
/// [`ImageOutcome`](crate::ImageOutcome) and friends.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Video(#[from] VideoError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feature needs configuration that was not supplied.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
