pub mod health;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/functions/v1`.
pub fn function_routes() -> Router<AppState> {
    Router::new().merge(video::router())
}
