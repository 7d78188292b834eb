//! WallMania video relay server library.
//!
//! The relay runs a whole video job (submit, poll, resolve) on behalf of
//! clients so vendor credentials never leave the server. Exposed as a
//! library so integration tests and the binary share the same router.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
pub mod state;
