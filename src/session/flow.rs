//! Guided, step-by-step need capture ending in a single analysis.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::advisor::{AdvisorAgent, AdvisorResponse, ContextOverrides};
use crate::error::Result;

pub const INDUSTRIES: &[&str] = &[
    "Restaurant & Hospitality",
    "E-commerce & Retail",
    "Healthcare & Wellness",
    "Professional Services",
    "Technology & SaaS",
    "Education & Training",
    "Real Estate",
    "Manufacturing",
    "Other",
];

pub const BUDGET_RANGES: &[&str] = &[
    "Under $5,000",
    "$5,000 - $15,000",
    "$15,000 - $50,000",
    "$50,000 - $100,000",
    "$100,000+",
    "Not sure yet",
];

pub const TIMELINE_OPTIONS: &[&str] = &[
    "ASAP (1-2 weeks)",
    "1-2 months",
    "3-6 months",
    "6+ months",
    "Not sure yet",
];

/// Shortest needs description accepted before moving on.
const MIN_NEEDS_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    Welcome,
    Needs,
    Industry,
    Budget,
    Timeline,
    Results,
}

impl FlowStep {
    pub const ALL: [FlowStep; 6] = [
        Self::Welcome,
        Self::Needs,
        Self::Industry,
        Self::Budget,
        Self::Timeline,
        Self::Results,
    ];

    fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

/// Answers captured so far plus the analysis result, once submitted.
#[derive(Debug, Clone)]
pub struct AdvisorFlow {
    step: FlowStep,
    pub needs: String,
    pub industry: String,
    pub budget: String,
    pub timeline: String,
    results: Option<AdvisorResponse>,
}

impl Default for AdvisorFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorFlow {
    pub fn new() -> Self {
        Self {
            step: FlowStep::Welcome,
            needs: String::new(),
            industry: String::new(),
            budget: String::new(),
            timeline: String::new(),
            results: None,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn results(&self) -> Option<&AdvisorResponse> {
        self.results.as_ref()
    }

    /// Advance one step; stays put on the last step.
    pub fn next(&mut self) -> FlowStep {
        if let Some(next) = FlowStep::ALL.get(self.step.index() + 1) {
            self.step = *next;
        }
        self.step
    }

    /// Go back one step; stays put on the first step.
    pub fn previous(&mut self) -> FlowStep {
        if let Some(index) = self.step.index().checked_sub(1) {
            self.step = FlowStep::ALL[index];
        }
        self.step
    }

    /// Completion percentage counting the current step as done.
    pub fn progress(&self) -> f64 {
        (self.step.index() + 1) as f64 / FlowStep::ALL.len() as f64 * 100.0
    }

    /// Whether the current step has what it needs to move on.
    pub fn can_proceed(&self) -> bool {
        match self.step {
            FlowStep::Welcome => true,
            FlowStep::Needs => self.needs.trim().chars().count() >= MIN_NEEDS_CHARS,
            FlowStep::Industry => !self.industry.is_empty(),
            FlowStep::Budget => !self.budget.is_empty(),
            FlowStep::Timeline => !self.timeline.is_empty(),
            FlowStep::Results => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The combined description sent for analysis.
    pub fn description(&self) -> String {
        format!(
            "Industry: {}. Budget: {}. Timeline: {}. Needs: {}",
            self.industry, self.budget, self.timeline, self.needs
        )
    }

    fn overrides(&self) -> ContextOverrides {
        let mut overrides = ContextOverrides::new();
        if !self.industry.is_empty() {
            overrides = overrides.with_industry(&self.industry);
        }
        if !self.budget.is_empty() {
            overrides = overrides.with_budget(&self.budget);
        }
        if !self.timeline.is_empty() {
            overrides = overrides.with_timeline(&self.timeline);
        }
        overrides
    }

    /// Analyze the captured answers and move to the results step.
    ///
    /// On error the flow keeps its current step and answers.
    #[instrument(skip(self, agent), fields(step = ?self.step))]
    pub async fn submit(&mut self, agent: &AdvisorAgent) -> Result<&AdvisorResponse> {
        let response = agent
            .analyze_need(&self.description(), self.overrides())
            .await?;

        info!(
            recommendations = response.recommendations.len(),
            "Flow analysis complete"
        );
        self.step = FlowStep::Results;
        Ok(self.results.insert(response))
    }
}
