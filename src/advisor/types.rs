//! Advisor types: the response contract, analysis context and backend config.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse operating-cost label for a backend. Not a real price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostTier {
    #[serde(rename = "Free")]
    Free,
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    High,
}

impl CostTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Low => "$",
            Self::High => "$$",
        }
    }
}

impl std::fmt::Display for CostTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One recommended catalog service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Catalog id; may not resolve when echoed by a remote model
    pub service_id: String,
    pub title: String,
    pub description: String,
    /// Relevance score (0.0 - 1.0)
    pub relevance: f64,
    /// Phase names for this service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Vec<String>>,
    /// Free-text duration, e.g. "8-12 weeks"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// The canonical shape every backend produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorResponse {
    /// Human-readable summary
    pub message: String,
    /// Recommendations in the order the backend produced them
    pub recommendations: Vec<Recommendation>,
    pub next_steps: Vec<String>,
    /// Confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Rendered roadmap lines. Empty strings are blank separators and
    /// marker-prefixed lines are section headers.
    pub roadmap: Vec<String>,
    /// Display name of the producing backend
    pub provider: String,
    pub cost: CostTier,
}

impl AdvisorResponse {
    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }
}

/// A recommendable service offering from the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Project a CMS document onto a catalog entry.
    ///
    /// Accepts either `_id` or `id`. Documents without an id or a title are
    /// rejected; a missing description becomes empty.
    pub fn from_document(doc: &Value) -> Option<Self> {
        let id = doc
            .get("_id")
            .or_else(|| doc.get("id"))
            .and_then(Value::as_str)?;
        let title = doc.get("title").and_then(Value::as_str)?;
        let description = doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self::new(id, title, description))
    }
}

/// Input to a single analysis call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    /// Catalog snapshot the backend may recommend from
    pub services: Vec<CatalogEntry>,
    pub user_industry: Option<String>,
    pub user_budget: Option<String>,
    pub user_timeline: Option<String>,
    /// Earlier advisor replies in the same conversation, oldest first
    #[serde(default)]
    pub previous_responses: Vec<String>,
}

impl AnalysisContext {
    pub fn new(services: Vec<CatalogEntry>) -> Self {
        Self {
            services,
            ..Default::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.user_industry = Some(industry.into());
        self
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.user_budget = Some(budget.into());
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.user_timeline = Some(timeline.into());
        self
    }
}

/// Caller-supplied parts of an [`AnalysisContext`]; the catalog always comes
/// from the agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextOverrides {
    pub user_industry: Option<String>,
    pub user_budget: Option<String>,
    pub user_timeline: Option<String>,
    pub previous_responses: Vec<String>,
}

impl ContextOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.user_industry = Some(industry.into());
        self
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.user_budget = Some(budget.into());
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.user_timeline = Some(timeline.into());
        self
    }

    /// Earlier advisor replies, oldest first.
    pub fn with_previous_responses(mut self, responses: Vec<String>) -> Self {
        self.previous_responses = responses;
        self
    }

    /// Merge into a full context over the given catalog.
    pub fn into_context(self, services: Vec<CatalogEntry>) -> AnalysisContext {
        AnalysisContext {
            services,
            user_industry: self.user_industry,
            user_budget: self.user_budget,
            user_timeline: self.user_timeline,
            previous_responses: self.previous_responses,
        }
    }
}

/// Configuration used to construct a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendConfig {
    /// Registry tag, e.g. "openai", "openrouter", "mock"
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl BackendConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Credential, treating an empty string as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}
