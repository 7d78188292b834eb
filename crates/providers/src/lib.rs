//! HTTP clients for the remote generation providers.
//!
//! - [`image`]: text-to-image with a provider fallback chain that ends in
//!   local placeholder synthesis.
//! - [`video`]: text-to-video jobs (submit → poll → fetch) against a
//!   vendor API, or through the same-origin relay.

pub mod error;
pub mod http;
pub mod image;
pub mod video;

pub use error::ProviderError;
