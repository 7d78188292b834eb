//! Text-to-image generation with provider fallback.
//!
//! Order: primary generative provider → secondary stock-photo provider
//! → local placeholder. Remote failures are logged and swallowed, so
//! [`ImageGenerator::generate`] only errors if local synthesis itself
//! fails.

use std::time::Duration;

use rand::Rng;
use reqwest::header::ACCEPT;
use reqwest::Url;
use wallmania_core::codec::sniff_mime;
use wallmania_core::placeholder::{render_placeholder, PLACEHOLDER_MIME};
use wallmania_core::types::{Dimensions, Orientation};

use crate::error::ProviderError;
use crate::http::read_body;

/// Default primary provider (prompt-to-image over GET).
pub const DEFAULT_PRIMARY_URL: &str = "https://image.pollinations.ai";
/// Default secondary provider (random stock photo of a given size).
pub const DEFAULT_FALLBACK_URL: &str = "https://picsum.photos";
/// Model requested from the primary provider.
const PRIMARY_MODEL: &str = "flux";
/// MIME type assumed when neither headers nor content identify the image.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Endpoints and limits for the image providers.
#[derive(Debug, Clone)]
pub struct ImageProviderConfig {
    pub primary_base_url: String,
    pub fallback_base_url: String,
    /// Per-request timeout for each remote attempt.
    pub request_timeout: Duration,
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        Self {
            primary_base_url: DEFAULT_PRIMARY_URL.to_string(),
            fallback_base_url: DEFAULT_FALLBACK_URL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Which link of the fallback chain produced an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Primary,
    Fallback,
    Placeholder,
}

impl ImageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSource::Primary => "primary",
            ImageSource::Fallback => "fallback",
            ImageSource::Placeholder => "placeholder",
        }
    }
}

/// A self-contained generated image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub source: ImageSource,
}

/// Client for the text-to-image fallback chain.
pub struct ImageGenerator {
    client: reqwest::Client,
    config: ImageProviderConfig,
}

impl ImageGenerator {
    pub fn new(config: ImageProviderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a generator reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ImageProviderConfig) -> Self {
        Self { client, config }
    }

    /// Generate an image for `prompt` at the size implied by `orientation`.
    pub async fn generate(
        &self,
        prompt: &str,
        orientation: Orientation,
    ) -> Result<GeneratedImage, ProviderError> {
        let dims = orientation.dimensions();
        // ThreadRng is !Send; keep it out of the await points below.
        let (seed, nonce) = {
            let mut rng = rand::rng();
            (
                rng.random_range(0..1_000_000u32),
                rng.random_range(0..1_000u32),
            )
        };

        let attempts = [
            (ImageSource::Primary, self.primary_url(prompt, dims, seed)),
            (ImageSource::Fallback, self.fallback_url(dims, nonce)),
        ];

        for (source, url) in attempts {
            let result = match url {
                Ok(url) => self.fetch_image(url).await,
                Err(e) => Err(e),
            };
            match result {
                Ok((bytes, mime_type)) => {
                    tracing::info!(
                        provider = source.as_str(),
                        size_bytes = bytes.len(),
                        "Image provider succeeded",
                    );
                    return Ok(GeneratedImage {
                        bytes,
                        mime_type,
                        source,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        provider = source.as_str(),
                        error = %e,
                        "Image provider failed, trying next",
                    );
                }
            }
        }

        tracing::info!(prompt_len = prompt.len(), "Rendering local placeholder image");
        let bytes = render_placeholder(prompt, dims)?;
        Ok(GeneratedImage {
            bytes,
            mime_type: PLACEHOLDER_MIME.to_string(),
            source: ImageSource::Placeholder,
        })
    }

    /// `{primary}/prompt/{prompt}?width=W&height=H&seed=S&model=flux`
    pub fn primary_url(&self, prompt: &str, dims: Dimensions, seed: u32) -> Result<Url, ProviderError> {
        let mut url = parse_base(&self.config.primary_base_url)?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.config.primary_base_url.clone()))?
            .pop_if_empty()
            .push("prompt")
            .push(prompt);
        url.query_pairs_mut()
            .append_pair("width", &dims.width.to_string())
            .append_pair("height", &dims.height.to_string())
            .append_pair("seed", &seed.to_string())
            .append_pair("model", PRIMARY_MODEL);
        Ok(url)
    }

    /// `{fallback}/{W}/{H}?random=N`
    pub fn fallback_url(&self, dims: Dimensions, nonce: u32) -> Result<Url, ProviderError> {
        let mut url = parse_base(&self.config.fallback_base_url)?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.config.fallback_base_url.clone()))?
            .pop_if_empty()
            .push(&dims.width.to_string())
            .push(&dims.height.to_string());
        url.query_pairs_mut()
            .append_pair("random", &nonce.to_string());
        Ok(url)
    }

    // ---- private helpers ----

    async fn fetch_image(&self, url: Url) -> Result<(Vec<u8>, String), ProviderError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "image/*")
            .timeout(self.config.request_timeout)
            .send()
            .await?;
        let body = read_body(response).await?;
        if body.bytes.is_empty() {
            return Err(ProviderError::MissingField("image body"));
        }

        let mime_type = body
            .content_type
            .filter(|ct| ct.starts_with("image/"))
            .or_else(|| sniff_mime(&body.bytes).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        Ok((body.bytes, mime_type))
    }
}

fn parse_base(base: &str) -> Result<Url, ProviderError> {
    Url::parse(base).map_err(|e| ProviderError::InvalidUrl(format!("{base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ImageGenerator {
        ImageGenerator::new(ImageProviderConfig::default())
    }

    #[test]
    fn primary_url_encodes_prompt_and_size() {
        let url = generator()
            .primary_url("neon city & rain", Orientation::Portrait.dimensions(), 42)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://image.pollinations.ai/prompt/neon%20city%20&%20rain?width=1080&height=1920&seed=42&model=flux"
        );
    }

    #[test]
    fn primary_url_escapes_slashes_in_prompt() {
        let url = generator()
            .primary_url("a/b", Orientation::Landscape.dimensions(), 1)
            .unwrap();
        assert!(url.path().ends_with("/prompt/a%2Fb"));
    }

    #[test]
    fn fallback_url_uses_dimensions() {
        let url = generator()
            .fallback_url(Orientation::Landscape.dimensions(), 7)
            .unwrap();
        assert_eq!(url.as_str(), "https://picsum.photos/1920/1080?random=7");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let gen = ImageGenerator::new(ImageProviderConfig {
            primary_base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(
            gen.primary_url("x", Orientation::Portrait.dimensions(), 1),
            Err(ProviderError::InvalidUrl(_))
        ));
    }
}
