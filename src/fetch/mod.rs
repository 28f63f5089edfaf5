//! HTTP plumbing shared by the dataset clients.

mod basic;

pub use basic::BasicClient;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Request, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Executes prepared requests. Implemented by [`BasicClient`] and by test doubles.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// GETs `url` and decodes the JSON body as `T`.
///
/// # Errors
///
/// Fails on transport errors, non-success statuses and undecodable bodies.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()?;

    let bytes = resp.bytes().await?;
    debug!(url, bytes = bytes.len(), "Response received");

    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON from {url}"))
}
