//! Shared response handling for provider clients.

use reqwest::header::CONTENT_TYPE;

use crate::error::ProviderError;

/// A downloaded binary payload.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub bytes: Vec<u8>,
    /// `Content-Type` essence (parameters stripped), if the server sent one.
    pub content_type: Option<String>,
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`ProviderError::Api`] containing the
/// status and body text on failure.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

/// Read a successful response body into memory.
pub async fn read_body(response: reqwest::Response) -> Result<Downloaded, ProviderError> {
    let response = ensure_success(response).await?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());
    let bytes = response.bytes().await?.to_vec();
    Ok(Downloaded {
        bytes,
        content_type,
    })
}

/// `GET url` and read the body into memory.
pub async fn download(client: &reqwest::Client, url: &str) -> Result<Downloaded, ProviderError> {
    let response = client.get(url).send().await?;
    read_body(response).await
}
