// src/fetch/mod.rs

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use tracing::info;
use url::Url;

/// Fetch the remote Parquet dataset into memory.
///
/// One shot, no retry: the file is small and static, and a failed fetch is
/// fatal to site assembly anyway. Non-2xx statuses are errors.
pub async fn fetch_parquet(client: &Client, url: &Url) -> Result<Bytes> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("reading body of {url}"))?;

    info!(url = %url, bytes = bytes.len(), "fetched dataset");
    Ok(bytes)
}
