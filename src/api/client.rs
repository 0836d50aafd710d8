//! HTTP client for the Respio listing service
//!
//! Wraps reqwest::Client with the configured base URL and a fixed
//! per-request timeout. The client is stateless across calls and attaches
//! no authentication headers.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::TransportError;
use crate::config::Config;

/// Fixed per-request timeout budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the listing service REST API.
///
/// Shared by the listing and messaging operations; no retry, no caching,
/// no batching. Failures surface unchanged as [`TransportError`].
pub struct RespioClient {
    http: reqwest::Client,
    base_url: String,
}

impl RespioClient {
    /// Load config and build the client against the effective base URL.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::with_base_url(&config.api_url())
    }

    /// Build a client against an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Build a client with a custom timeout budget (shorter in tests).
    pub(super) fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request, decoding the JSON response body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::from_send(&url, e))?;

        decode_json(check_response(resp, &url).await?, &url).await
    }

    /// GET request with query parameters, decoding the JSON response body.
    pub async fn get_query_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!("GET {} (with query)", url);

        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::from_send(&url, e))?;

        decode_json(check_response(resp, &url).await?, &url).await
    }

    /// POST request with a JSON body, decoding the JSON response body.
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!("POST {}", url);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::from_send(&url, e))?;

        decode_json(check_response(resp, &url).await?, &url).await
    }
}

/// Check HTTP response status and surface non-success as a TransportError.
async fn check_response(
    resp: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, TransportError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        });
    }
    Ok(resp)
}

/// Decode a JSON response body into the expected shape.
async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    url: &str,
) -> Result<T, TransportError> {
    resp.json().await.map_err(|source| TransportError::Decode {
        url: url.to_string(),
        source,
    })
}
