//! Backend selection: a static registry from provider tag to constructor.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

use super::backend::AdvisorBackend;
use super::openai::OpenAiBackend;
use super::openrouter::OpenRouterBackend;
use super::rule_based::RuleBasedBackend;
use super::types::{BackendConfig, CostTier};
use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Environment variable naming the active provider.
pub const PROVIDER_ENV: &str = "AI_PROVIDER";

/// Registered backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    OpenRouter,
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
            Self::Mock => "mock",
        }
    }

    /// Prefix of this provider's `<PREFIX>_API_KEY` style settings.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI",
            Self::OpenRouter => "OPENROUTER",
            Self::Mock => "MOCK",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .map(|(kind, _)| *kind)
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", s)))
    }
}

/// A registered backend, as listed for capability discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub kind: ProviderKind,
    pub name: String,
    pub cost: CostTier,
}

type Constructor = fn(BackendConfig) -> Arc<dyn AdvisorBackend>;

fn openai(config: BackendConfig) -> Arc<dyn AdvisorBackend> {
    Arc::new(OpenAiBackend::new(config))
}

fn openrouter(config: BackendConfig) -> Arc<dyn AdvisorBackend> {
    Arc::new(OpenRouterBackend::new(config))
}

fn mock(_config: BackendConfig) -> Arc<dyn AdvisorBackend> {
    Arc::new(RuleBasedBackend::new())
}

/// Registry in listing order.
const REGISTRY: &[(ProviderKind, Constructor)] = &[
    (ProviderKind::OpenAi, openai),
    (ProviderKind::OpenRouter, openrouter),
    (ProviderKind::Mock, mock),
];

fn constructor(kind: ProviderKind) -> Constructor {
    REGISTRY
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, ctor)| *ctor)
        .unwrap_or(mock)
}

/// Construct the backend named by `config.provider`.
///
/// Unknown tags fall back to the rule-based backend; selection never fails.
pub fn create_backend(config: &BackendConfig) -> Arc<dyn AdvisorBackend> {
    match config.provider.parse::<ProviderKind>() {
        Ok(kind) => {
            debug!(provider = %kind, "Creating backend");
            constructor(kind)(config.clone())
        }
        Err(_) => {
            warn!(
                provider = %config.provider,
                "Provider type not found, falling back to mock"
            );
            mock(config.clone())
        }
    }
}

/// Every registered backend with its default-configured identity.
pub fn list_available() -> Vec<ProviderInfo> {
    REGISTRY
        .iter()
        .map(|(kind, ctor)| {
            let backend = ctor(BackendConfig::new(kind.as_str()));
            ProviderInfo {
                kind: *kind,
                name: backend.name(),
                cost: backend.cost(),
            }
        })
        .collect()
}

/// Resolve the default backend configuration from the process environment.
pub fn resolve_default_config() -> BackendConfig {
    resolve_config_with(|key| std::env::var(key).ok())
}

/// Resolve the default backend configuration from an arbitrary lookup.
///
/// `AI_PROVIDER` picks the provider. For a known provider its
/// `<PREFIX>_API_KEY`, `_MODEL`, `_TEMPERATURE` and `_MAX_TOKENS` settings
/// are read; anything else yields the mock backend without credentials.
pub fn resolve_config_with<F>(lookup: F) -> BackendConfig
where
    F: Fn(&str) -> Option<String>,
{
    let Some(kind) = lookup(PROVIDER_ENV).and_then(|p| p.parse::<ProviderKind>().ok()) else {
        return BackendConfig::new(ProviderKind::Mock.as_str());
    };

    let prefix = kind.env_prefix();
    let setting = |name: &str| {
        lookup(&format!("{}_{}", prefix, name)).filter(|v| !v.trim().is_empty())
    };

    BackendConfig {
        provider: kind.as_str().to_string(),
        api_key: setting("API_KEY"),
        model: setting("MODEL"),
        temperature: Some(
            setting("TEMPERATURE")
                .and_then(|t| t.trim().parse::<f64>().ok())
                .filter(|t| t.is_finite())
                .unwrap_or(DEFAULT_TEMPERATURE),
        ),
        max_tokens: Some(
            setting("MAX_TOKENS")
                .and_then(|t| t.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_unknown_provider_falls_back_to_mock() {
        let backend = create_backend(&BackendConfig::new("unknown-xyz"));
        assert_eq!(backend.name(), "Mock AI (Demo)");
        assert_eq!(backend.cost(), CostTier::Free);
        assert!(backend.is_available());
    }

    #[test]
    fn test_create_known_backends() {
        let openai = create_backend(&BackendConfig::new("openai").with_api_key("sk"));
        assert_eq!(openai.name(), "OpenAI GPT-4");
        assert!(openai.is_available());

        let openrouter = create_backend(&BackendConfig::new("OpenRouter"));
        assert!(openrouter.name().starts_with("OpenRouter ("));
        assert!(!openrouter.is_available());
    }

    #[test]
    fn test_list_available_in_registry_order() {
        let providers = list_available();
        let kinds: Vec<_> = providers.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ProviderKind::OpenAi, ProviderKind::OpenRouter, ProviderKind::Mock]
        );
        assert_eq!(providers[0].cost, CostTier::High);
        assert_eq!(providers[1].cost, CostTier::Free);
        assert_eq!(providers[2].name, "Mock AI (Demo)");
    }

    #[test]
    fn test_resolve_known_provider() {
        let config = resolve_config_with(env(&[
            ("AI_PROVIDER", "openrouter"),
            ("OPENROUTER_API_KEY", "or-123"),
            ("OPENROUTER_MODEL", "openai/gpt-4o"),
            ("OPENROUTER_TEMPERATURE", "0.2"),
            ("OPENROUTER_MAX_TOKENS", "900"),
        ]));

        assert_eq!(config.provider, "openrouter");
        assert_eq!(config.api_key.as_deref(), Some("or-123"));
        assert_eq!(config.model.as_deref(), Some("openai/gpt-4o"));
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.max_tokens, Some(900));
    }

    #[test]
    fn test_resolve_defaults_for_unset_or_unparsable() {
        let config = resolve_config_with(env(&[
            ("AI_PROVIDER", "openai"),
            ("OPENAI_TEMPERATURE", "warm"),
        ]));

        assert_eq!(config.provider, "openai");
        assert!(config.api_key.is_none());
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tokens, Some(1500));
    }

    #[test]
    fn test_resolve_unknown_or_missing_provider_is_mock() {
        let unknown = resolve_config_with(env(&[("AI_PROVIDER", "groq"), ("GROQ_API_KEY", "g")]));
        assert_eq!(unknown, BackendConfig::new("mock"));

        let missing = resolve_config_with(env(&[]));
        assert_eq!(missing, BackendConfig::new("mock"));
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" MOCK ".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!("anthropic".parse::<ProviderKind>().is_err());
        assert_eq!(
            serde_json::to_value(ProviderKind::OpenRouter).unwrap(),
            serde_json::json!("openrouter")
        );
    }
}
