//! Pluggable advisor backends with reply normalization.
//!
//! An [`AdvisorAgent`] owns one active [`AdvisorBackend`] and the cached
//! service catalog. Backends are either the offline [`RuleBasedBackend`] or a
//! remote chat-completion backend whose free-text reply is run through the
//! [`ResponseNormalizer`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use advisor_core::advisor::{AdvisorAgent, ContextOverrides};
//! use advisor_core::content::StaticContentStore;
//!
//! let agent = AdvisorAgent::from_env(Arc::new(StaticContentStore::new()));
//! agent.initialize().await;
//!
//! let response = agent
//!     .analyze_need("I need a mobile app", ContextOverrides::new())
//!     .await?;
//! println!("{} ({})", response.message, response.provider);
//! ```

mod agent;
mod backend;
mod chat;
mod normalizer;
mod openai;
mod openrouter;
mod prompt;
mod roadmap;
mod rule_based;
mod selector;
#[cfg(test)]
mod testing;
mod types;

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Completion token limit used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

pub use agent::AdvisorAgent;
pub use backend::{AdvisorBackend, ProviderStatus};
pub use chat::{ChatMessage, ChatRequest, ChatTransport, HttpChatTransport};
pub use normalizer::{
    ResponseNormalizer, DEFAULT_CONFIDENCE, FALLBACK_NEXT_STEP, MAX_RECOMMENDATIONS,
};
pub use openai::OpenAiBackend;
pub use openrouter::{model_cost, ModelInfo, OpenRouterBackend};
pub use prompt::{build_prompt, catalog_list, ADVISOR_SYSTEM_PROMPT};
pub use roadmap::{default_roadmap, general_roadmap};
pub use rule_based::RuleBasedBackend;
pub use selector::{
    create_backend, list_available, resolve_config_with, resolve_default_config, ProviderInfo,
    ProviderKind, PROVIDER_ENV,
};
pub use types::{
    AdvisorResponse, AnalysisContext, BackendConfig, CatalogEntry, ContextOverrides, CostTier,
    Recommendation,
};
