//! # advisor-core
//!
//! A business advisor that turns a free-text description of a need into
//! service recommendations, a phased roadmap and next steps.
//!
//! ## Core Components
//!
//! - **Advisor**: Interchangeable backends (offline rule-based, OpenAI,
//!   OpenRouter), the reply normalizer, and the [`AdvisorAgent`] facade
//! - **Content**: Read-only CMS access supplying the service catalog
//! - **Session**: Chat transcript and the guided step-by-step flow
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use advisor_core::{AdvisorAgent, AdvisorSession, FallbackContentStore, SanityClient, SanityConfig};
//!
//! let cms = Arc::new(SanityClient::new(SanityConfig::from_env()));
//! let agent = AdvisorAgent::from_env(Arc::new(FallbackContentStore::with_static(cms)));
//! agent.initialize().await;
//!
//! let mut session = AdvisorSession::default();
//! if let Some(reply) = session.send(&agent, "We need an online store").await {
//!     println!("{}", reply.content);
//! }
//! ```

pub mod advisor;
pub mod content;
pub mod error;
mod http;
pub mod session;

// Re-exports for convenience
pub use advisor::{
    create_backend, list_available, resolve_default_config, AdvisorAgent, AdvisorBackend,
    AdvisorResponse, AnalysisContext, BackendConfig, CatalogEntry, ContextOverrides, CostTier,
    ProviderKind, ProviderStatus, Recommendation, ResponseNormalizer, RuleBasedBackend,
};
pub use content::{
    ContentStore, ContentType, FallbackContentStore, SanityClient, SanityConfig,
    StaticContentStore,
};
pub use error::{Error, Result};
pub use session::{AdvisorFlow, AdvisorSession, FlowStep, SessionConfig, APOLOGY_MESSAGE};
