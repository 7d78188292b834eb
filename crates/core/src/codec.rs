//! Binary ⇄ text conversion for assets kept in text-only storage.
//!
//! Assets are stored as standard base64 and displayed through
//! `data:{mime};base64,{payload}` locators, so redisplay never needs a
//! second network fetch.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// An asset decoded from a `data:` locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Encode a binary payload as base64 text.
pub fn to_persistable_form(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text produced by [`to_persistable_form`].
pub fn from_persistable_form(text: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| CoreError::Codec(format!("invalid base64 payload: {e}")))
}

/// Wrap stored base64 text into a directly renderable `data:` locator.
pub fn to_display_reference(text: &str, mime_type: &str) -> String {
    format!("{DATA_PREFIX}{mime_type}{BASE64_MARKER}{text}")
}

/// `true` if `locator` is an embedded `data:` locator.
pub fn is_display_reference(locator: &str) -> bool {
    locator.starts_with(DATA_PREFIX)
}

/// Split a `data:` locator back into its MIME type and payload bytes.
pub fn parse_display_reference(locator: &str) -> Result<DecodedAsset, CoreError> {
    let rest = locator
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| CoreError::Codec("locator does not start with 'data:'".to_string()))?;
    let (mime_type, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| CoreError::Codec("locator is not base64-encoded".to_string()))?;

    Ok(DecodedAsset {
        mime_type: mime_type.to_string(),
        bytes: from_persistable_form(payload)?,
    })
}

/// Best-effort MIME detection from leading magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}
