//! OpenSearch-compatible HTTP client. Mirrors the object-store adapter's
//! shape: a thin `reqwest` wrapper over a documented REST surface, with no
//! vendor SDK in the loop.

use reqwest::Client;
use serde_json::Value;

use crate::error::{SearchError, SearchResult};

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    pub fn from_env() -> SearchResult<Self> {
        let base_url = std::env::var("OPENSEARCH_URL")
            .map_err(|_| SearchError::config("OPENSEARCH_URL is not set"))?;
        Ok(Self {
            base_url,
            request_timeout_secs: std::env::var("OPENSEARCH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        })
    }
}

#[derive(Clone)]
pub struct SearchClient {
    http: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn from_env() -> SearchResult<Self> {
        Self::new(SearchConfig::from_env()?)
    }

    pub(crate) async fn put(&self, path: &str, body: &Value) -> SearchResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.put(&url).json(body).send().await?;
        Self::read_json_allow_conflict(resp).await
    }

    pub(crate) async fn post(&self, path: &str, body: &Value) -> SearchResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.post(&url).json(body).send().await?;
        Self::read_json(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> SearchResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.delete(&url).send().await?;
        Self::read_json_allow_conflict(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> SearchResult<Value> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(SearchError::IndexError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }

    /// Index/mapping creation is idempotent: a 400
    /// `resource_already_exists_exception` is not an error.
    async fn read_json_allow_conflict(resp: reqwest::Response) -> SearchResult<Value> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() && !body.contains("resource_already_exists_exception") {
            return Err(SearchError::IndexError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}
