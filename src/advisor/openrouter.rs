//! OpenRouter backend: one API key, many hosted models.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::{Error, Result};
use crate::http::build_http_client;

use super::backend::AdvisorBackend;
use super::chat::{ChatMessage, ChatRequest, ChatTransport, HttpChatTransport};
use super::normalizer::ResponseNormalizer;
use super::prompt::{build_prompt, ADVISOR_SYSTEM_PROMPT, REASONING_ADDENDUM};
use super::types::{AdvisorResponse, AnalysisContext, BackendConfig, CostTier};
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// A model offered by OpenRouter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub cost: CostTier,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<Value>,
}

fn model_info(entry: &Value) -> Option<ModelInfo> {
    let id = entry.get("id")?.as_str()?.to_string();
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(id.as_str())
        .to_string();
    let priced = entry
        .get("pricing")
        .and_then(|p| p.get("prompt"))
        .is_some_and(|p| match p {
            Value::String(s) => !s.is_empty(),
            Value::Null | Value::Bool(false) => false,
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        });

    Some(ModelInfo {
        id,
        name,
        cost: if priced { CostTier::Low } else { CostTier::High },
    })
}

/// Cost tier implied by a model id.
pub fn model_cost(model: &str) -> CostTier {
    if model.contains("free") {
        CostTier::Free
    } else if model.contains("deepseek") {
        CostTier::Low
    } else if model.contains("gpt-4") {
        CostTier::High
    } else {
        CostTier::Low
    }
}

/// Backend calling OpenRouter's OpenAI-compatible API.
pub struct OpenRouterBackend {
    config: BackendConfig,
    base_url: String,
    site_url: String,
    app_title: String,
    http: Client,
    transport: Arc<dyn ChatTransport>,
    /// Set once a transport is injected; later builder calls keep it
    injected: bool,
}

impl OpenRouterBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";
    pub const DEFAULT_MODEL: &'static str = "deepseek/deepseek-r1-0528:free";
    const DEFAULT_SITE_URL: &'static str = "http://localhost";
    const DEFAULT_APP_TITLE: &'static str = "Strategic Business Advisor";

    pub fn new(config: BackendConfig) -> Self {
        let mut backend = Self {
            config,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            site_url: Self::DEFAULT_SITE_URL.to_string(),
            app_title: Self::DEFAULT_APP_TITLE.to_string(),
            http: build_http_client(),
            transport: Arc::new(HttpChatTransport::new("OpenRouter", Self::DEFAULT_BASE_URL)),
            injected: false,
        };
        backend.rebuild_transport();
        backend
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.rebuild_transport();
        self
    }

    /// Site attribution sent as `HTTP-Referer` and `X-Title`.
    pub fn with_site(mut self, site_url: impl Into<String>, app_title: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self.app_title = app_title.into();
        self.rebuild_transport();
        self
    }

    /// Replace the completion transport. Base URL and site settings then
    /// only affect `list_models`.
    pub fn with_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = transport;
        self.injected = true;
        self
    }

    fn rebuild_transport(&mut self) {
        if self.injected {
            return;
        }
        self.transport = Arc::new(
            HttpChatTransport::new("OpenRouter", self.base_url.clone())
                .with_header("HTTP-Referer", self.site_url.clone())
                .with_header("X-Title", self.app_title.clone()),
        );
    }

    pub fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(Self::DEFAULT_MODEL)
    }

    fn request(&self, input: &str, context: &AnalysisContext) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: vec![
                ChatMessage::system(format!("{}\n\n{}", ADVISOR_SYSTEM_PROMPT, REASONING_ADDENDUM)),
                ChatMessage::user(build_prompt(input, context)),
            ],
            temperature: self.config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream: Some(false),
        }
    }

    /// Models offered by OpenRouter. Empty on any failure.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        let Some(api_key) = self.config.credential() else {
            return Vec::new();
        };

        match self.fetch_models(api_key).await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "Failed to fetch OpenRouter models");
                Vec::new()
            }
        }
    }

    async fn fetch_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.site_url)
            .send()
            .await
            .map_err(|e| Error::transport("OpenRouter", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::backend(
                "OpenRouter",
                status.as_u16(),
                "Failed to fetch models",
            ));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| Error::transport("OpenRouter", e))?;
        Ok(list.data.iter().filter_map(model_info).collect())
    }
}

#[async_trait]
impl AdvisorBackend for OpenRouterBackend {
    fn name(&self) -> String {
        format!("OpenRouter ({})", self.model())
    }

    fn is_available(&self) -> bool {
        self.config.credential().is_some()
    }

    fn cost(&self) -> CostTier {
        model_cost(self.model())
    }

    #[instrument(skip(self, input, context), fields(model = %self.model()))]
    async fn analyze(&self, input: &str, context: &AnalysisContext) -> Result<AdvisorResponse> {
        let api_key = self
            .config
            .credential()
            .ok_or_else(|| Error::config("OpenRouter API key not configured"))?;

        let request = self.request(input, context);
        let reply = self.transport.send(api_key, &request).await?;

        Ok(ResponseNormalizer::new(self.name(), self.cost()).normalize(&reply))
    }
}
