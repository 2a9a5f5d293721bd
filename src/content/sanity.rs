//! Headless CMS client over the Sanity HTTP query API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::http::build_http_client;

use super::store::{ContentStore, ContentType};

/// Configuration for the CMS client.
#[derive(Debug, Clone, PartialEq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Read token; only needed for private datasets
    pub token: Option<String>,
    /// Query the edge cache instead of the live API
    pub use_cdn: bool,
}

impl SanityConfig {
    pub const DEFAULT_PROJECT_ID: &'static str = "ip6waw2s";
    pub const DEFAULT_DATASET: &'static str = "production";
    pub const DEFAULT_API_VERSION: &'static str = "2024-01-01";

    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: Self::DEFAULT_DATASET.to_string(),
            api_version: Self::DEFAULT_API_VERSION.to_string(),
            token: None,
            use_cdn: false,
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            project_id: value("SANITY_PROJECT_ID")
                .unwrap_or_else(|| Self::DEFAULT_PROJECT_ID.to_string()),
            dataset: value("SANITY_DATASET").unwrap_or_else(|| Self::DEFAULT_DATASET.to_string()),
            api_version: value("SANITY_API_VERSION")
                .unwrap_or_else(|| Self::DEFAULT_API_VERSION.to_string()),
            token: value("SANITY_TOKEN"),
            use_cdn: value("SANITY_USE_CDN")
                .map(|s| s != "0" && s.to_lowercase() != "false")
                .unwrap_or(false),
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_cdn(mut self, use_cdn: bool) -> Self {
        self.use_cdn = use_cdn;
        self
    }

    /// Query endpoint for this project and dataset.
    pub fn query_url(&self) -> String {
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id, host, self.api_version, self.dataset
        )
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Content store backed by the CMS query API.
pub struct SanityClient {
    config: SanityConfig,
    http: Client,
    query_url: String,
}

impl SanityClient {
    pub fn new(config: SanityConfig) -> Self {
        let query_url = config.query_url();
        Self {
            config,
            http: build_http_client(),
            query_url,
        }
    }

    /// Override the query endpoint, e.g. for a proxy.
    pub fn with_query_url(mut self, url: impl Into<String>) -> Self {
        self.query_url = url.into();
        self
    }

    pub fn config(&self) -> &SanityConfig {
        &self.config
    }

    /// Run a raw GROQ query and return its `result` member.
    #[instrument(skip(self))]
    pub async fn query(&self, groq: &str) -> Result<Value> {
        let mut request = self.http.get(&self.query_url).query(&[("query", groq)]);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::content(format!("CMS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::content(format!("CMS query failed with status {}", status)));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::content(format!("Invalid CMS response: {}", e)))?;
        Ok(body.result)
    }
}

/// Documents from a query result: arrays as-is, a single object as one
/// document, null as none.
fn documents(result: Value) -> Vec<Value> {
    match result {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch(&self, content_type: ContentType) -> Result<Vec<Value>> {
        let result = self.query(&content_type.query()).await?;
        let docs = documents(result);
        debug!(content_type = %content_type, count = docs.len(), "Fetched documents");
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_query_url() {
        let config = SanityConfig::new("abc123");
        assert_eq!(
            config.query_url(),
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production"
        );
        assert_eq!(
            config.with_dataset("staging").with_cdn(true).query_url(),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/staging"
        );
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("SANITY_PROJECT_ID", "proj"),
            ("SANITY_TOKEN", "tok"),
            ("SANITY_USE_CDN", "true"),
        ]
        .into_iter()
        .collect();
        let config = SanityConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.project_id, "proj");
        assert_eq!(config.dataset, "production");
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert!(config.use_cdn);

        let defaults = SanityConfig::from_lookup(|_| None);
        assert_eq!(defaults, SanityConfig::new(SanityConfig::DEFAULT_PROJECT_ID));
    }

    #[test]
    fn test_documents_shapes() {
        assert_eq!(documents(json!([{"a": 1}, {"b": 2}])).len(), 2);
        assert_eq!(documents(json!({"_id": "home"})), vec![json!({"_id": "home"})]);
        assert!(documents(Value::Null).is_empty());
    }
}
