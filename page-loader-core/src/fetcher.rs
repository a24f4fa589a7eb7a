// Single-resource download

use crate::error::{MirrorError, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use tracing::debug;
use url::Url;

/// A fetched document: raw body plus the `Content-Type` it was served with.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// GET `url` and return the raw body. Non-2xx statuses are errors.
pub async fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    Ok(fetch_page(client, url).await?.body)
}

/// Like [`fetch_bytes`], also keeping the response's `Content-Type`.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage> {
    debug!("Fetching {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| MirrorError::fetch(url, e))?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|e| MirrorError::fetch(url, e))?;

    Ok(FetchedPage {
        body: body.to_vec(),
        content_type,
    })
}

/// Download `url` into `destination`, replacing any existing file.
///
/// Returns the number of bytes written.
pub async fn fetch_resource(client: &Client, url: &Url, destination: &Path) -> Result<u64> {
    let body = fetch_bytes(client, url).await?;

    tokio::fs::write(destination, &body)
        .await
        .map_err(|e| MirrorError::io(destination, e))?;

    debug!("Saved {} ({} bytes) to {}", url, body.len(), destination.display());
    Ok(body.len() as u64)
}
