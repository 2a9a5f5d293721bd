//! The backend trait every advisor implementation satisfies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::types::{AdvisorResponse, AnalysisContext, CostTier};

/// An interchangeable implementation of the analysis capability.
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Display name, also stamped into every response.
    fn name(&self) -> String;

    /// Whether the backend can serve requests. Never performs I/O.
    fn is_available(&self) -> bool;

    /// Relative operating cost.
    fn cost(&self) -> CostTier;

    /// Analyze free-text input against the given context.
    async fn analyze(&self, input: &str, context: &AnalysisContext) -> Result<AdvisorResponse>;
}

/// Snapshot of the active backend, as reported to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub name: String,
    pub cost: CostTier,
    pub is_available: bool,
}

impl ProviderStatus {
    pub fn of(backend: &dyn AdvisorBackend) -> Self {
        Self {
            name: backend.name(),
            cost: backend.cost(),
            is_available: backend.is_available(),
        }
    }
}
