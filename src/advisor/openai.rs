//! OpenAI chat-completion backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::error::{Error, Result};

use super::backend::AdvisorBackend;
use super::chat::{ChatMessage, ChatRequest, ChatTransport, HttpChatTransport};
use super::normalizer::ResponseNormalizer;
use super::prompt::{build_prompt, ADVISOR_SYSTEM_PROMPT};
use super::types::{AdvisorResponse, AnalysisContext, BackendConfig, CostTier};
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Backend calling the OpenAI chat-completions API.
pub struct OpenAiBackend {
    config: BackendConfig,
    transport: Arc<dyn ChatTransport>,
}

impl OpenAiBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4-turbo-preview";

    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            transport: Arc::new(HttpChatTransport::new("OpenAI", Self::DEFAULT_BASE_URL)),
        }
    }

    /// Point the backend at a compatible endpoint. Replaces any transport
    /// set earlier.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.transport = Arc::new(HttpChatTransport::new("OpenAI", base_url));
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn ChatTransport>) -> Self {
        self.transport = transport;
        self
    }

    fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(Self::DEFAULT_MODEL)
    }

    fn request(&self, input: &str, context: &AnalysisContext) -> ChatRequest {
        ChatRequest {
            model: self.model().to_string(),
            messages: vec![
                ChatMessage::system(ADVISOR_SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(input, context)),
            ],
            temperature: self.config.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream: None,
        }
    }
}

#[async_trait]
impl AdvisorBackend for OpenAiBackend {
    fn name(&self) -> String {
        "OpenAI GPT-4".to_string()
    }

    fn is_available(&self) -> bool {
        self.config.credential().is_some()
    }

    fn cost(&self) -> CostTier {
        CostTier::High
    }

    #[instrument(skip(self, input, context), fields(model = %self.model()))]
    async fn analyze(&self, input: &str, context: &AnalysisContext) -> Result<AdvisorResponse> {
        let api_key = self
            .config
            .credential()
            .ok_or_else(|| Error::config("OpenAI API key not configured"))?;

        let request = self.request(input, context);
        let reply = self.transport.send(api_key, &request).await?;

        Ok(ResponseNormalizer::new(self.name(), self.cost()).normalize(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::testing::ScriptedTransport;
    use crate::advisor::types::CatalogEntry;

    #[test]
    fn test_identity() {
        let backend = OpenAiBackend::new(BackendConfig::new("openai"));
        assert_eq!(backend.name(), "OpenAI GPT-4");
        assert_eq!(backend.cost(), CostTier::High);
        assert!(!backend.is_available());
        assert!(OpenAiBackend::new(BackendConfig::new("openai").with_api_key("sk")).is_available());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_io() {
        let transport = Arc::new(ScriptedTransport::replying("{}"));
        let backend =
            OpenAiBackend::new(BackendConfig::new("openai")).with_transport(transport.clone());

        let err = backend
            .analyze("hello", &AnalysisContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_request_uses_defaults_and_normalizes_reply() {
        let transport = Arc::new(ScriptedTransport::replying(
            r#"Analysis: {"message": "Build a web app", "confidence": 0.9, "provider": "evil"}"#,
        ));
        let backend = OpenAiBackend::new(BackendConfig::new("openai").with_api_key("sk-test"))
            .with_transport(transport.clone());
        let context = AnalysisContext::new(vec![CatalogEntry::new("s1", "Web Development", "Sites")]);

        let response = backend.analyze("Need a web app", &context).await.unwrap();

        assert_eq!(response.message, "Build a web app");
        assert_eq!(response.provider, "OpenAI GPT-4");
        assert_eq!(response.cost, CostTier::High);

        let (key, request) = transport.last_request().unwrap();
        assert_eq!(key, "sk-test");
        assert_eq!(request.model, "gpt-4-turbo-preview");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1500);
        assert_eq!(request.messages[0].role, "system");
        assert!(request.messages[1].content.contains("- Web Development: Sites"));
    }

    #[tokio::test]
    async fn test_backend_errors_propagate() {
        let transport = Arc::new(ScriptedTransport::failing(503, "Service Unavailable"));
        let backend = OpenAiBackend::new(
            BackendConfig::new("openai")
                .with_api_key("sk-test")
                .with_model("gpt-4o")
                .with_temperature(0.2)
                .with_max_tokens(800),
        )
        .with_transport(transport.clone());

        let err = backend
            .analyze("hello", &AnalysisContext::default())
            .await
            .unwrap_err();
        assert!(err.is_backend());
        assert_eq!(err.status(), Some(503));

        let (_, request) = transport.last_request().unwrap();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_tokens, 800);
    }
}
