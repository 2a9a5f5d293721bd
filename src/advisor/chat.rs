//! Chat-completion wire types and the HTTP transport used by remote backends.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::http::build_http_client;

/// A message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat-completion request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Sends a chat-completion request and returns the first choice's text.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request. An empty string means the reply had no content.
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String>;
}

/// Chat-completion transport over HTTPS.
pub struct HttpChatTransport {
    http: Client,
    provider: String,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl HttpChatTransport {
    pub fn new(provider: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: build_http_client(),
            provider: provider.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: Vec::new(),
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extract the reply text from a successful body.
    fn reply_text(&self, status: u16, body: &str) -> Result<String> {
        let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
            Error::backend(&self.provider, status, format!("Invalid response body: {}", e))
        })?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

/// Error message from a failed call: the server's message if it sent one,
/// else the status reason.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    #[instrument(skip(self, api_key, request), fields(provider = %self.provider, model = %request.model))]
    async fn send(&self, api_key: &str, request: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .header("content-type", "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| Error::transport(&self.provider, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(&self.provider, e))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "Completion request rejected");
            return Err(Error::backend(&self.provider, status.as_u16(), message));
        }

        debug!(bytes = body.len(), "Completion received");
        self.reply_text(status.as_u16(), &body)
    }
}
