use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

use crate::api::FetchError;
use crate::dashboard::Params;

const USER_AGENT: &str = concat!("sqlops-dashboard/", env!("CARGO_PKG_VERSION"));

/// The asynchronous network collaborator.
///
/// Each call resolves exactly once, to the parsed payload or to a
/// [`FetchError`]; timeouts are enforced here, not by the caller. A call
/// that panics is reported by the dispatcher as [`FetchError::Other`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, params: &Params) -> Result<Value, FetchError>;
    async fn post(&self, path: &str, body: &Params) -> Result<Value, FetchError>;
}

/// REST client for the cluster's status endpoints
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_custom_client(base_url, http_client))
    }

    pub fn with_custom_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn parse_response(response: reqwest::Response) -> Result<Value, FetchError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), &body));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest_error(&e))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn get(&self, path: &str, params: &Params) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest_error(&e))?;

        Self::parse_response(response).await
    }

    async fn post(&self, path: &str, body: &Params) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!("POST {} {:?}", url, body);

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest_error(&e))?;

        Self::parse_response(response).await
    }
}
