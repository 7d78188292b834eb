//! Domain types and pure logic for WallMania.
//!
//! Nothing in this crate performs I/O: quota arithmetic, the asset
//! codec, the placeholder renderer, and share-link builders are all
//! deterministic functions over plain data.

pub mod clock;
pub mod codec;
pub mod error;
pub mod naming;
pub mod palette;
pub mod placeholder;
pub mod quota;
pub mod record;
pub mod share;
pub mod types;
