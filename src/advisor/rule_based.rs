//! Deterministic offline backend driven by keyword containment.
//!
//! No network access. Useful as the default when no credential is
//! configured and as a stand-in for UI work.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;

use super::backend::AdvisorBackend;
use super::normalizer::MAX_RECOMMENDATIONS;
use super::roadmap::general_roadmap;
use super::types::{AdvisorResponse, AnalysisContext, CatalogEntry, CostTier, Recommendation};

/// Recommendations taken from the top of the catalog when nothing matched.
const GENERIC_PICKS: usize = 3;

const MATCHED_RELEVANCE: f64 = 0.9;
const GENERIC_RELEVANCE: f64 = 0.7;
const DEFAULT_TIMELINE: &str = "8-12 weeks";

/// A strategic category and the catalog titles it maps to.
struct Category {
    label: &'static str,
    /// Catalog title substrings, matched case-insensitively
    services: &'static [&'static str],
    /// Extra input keywords that select the category; "mobile" alone lets
    /// "a mobile app" reach the mobile strategy services
    keywords: &'static [&'static str],
}

/// Category table. Matches accumulate in this order.
const CATEGORIES: &[Category] = &[
    Category {
        label: "mobile strategy",
        services: &["Mobile App Development", "Cross-platform Solutions"],
        keywords: &["mobile"],
    },
    Category {
        label: "web presence",
        services: &["Website Development", "E-commerce Solutions"],
        keywords: &[],
    },
    Category {
        label: "ecommerce growth",
        services: &["E-commerce Development", "Digital Marketing"],
        keywords: &[],
    },
    Category {
        label: "api & integration",
        services: &["API Development", "System Integration"],
        keywords: &[],
    },
    Category {
        label: "digital transformation",
        services: &["Digital Strategy", "Technology Consulting"],
        keywords: &[],
    },
    Category {
        label: "business strategy",
        services: &["Business Consulting", "Strategic Planning"],
        keywords: &[],
    },
    Category {
        label: "design & ux",
        services: &["UI/UX Design", "Brand Design"],
        keywords: &[],
    },
    Category {
        label: "marketing",
        services: &["Digital Marketing", "SEO Optimization"],
        keywords: &[],
    },
    Category {
        label: "analytics",
        services: &["Data Analytics", "Business Intelligence"],
        keywords: &[],
    },
    Category {
        label: "automation",
        services: &["Process Automation", "Workflow Optimization"],
        keywords: &[],
    },
];

impl Category {
    fn matches_input(&self, input_lower: &str) -> bool {
        input_lower.contains(self.label)
            || self.keywords.iter().any(|k| input_lower.contains(k))
            || self
                .services
                .iter()
                .any(|s| input_lower.contains(&s.to_lowercase()))
    }

    fn matches_entry(&self, entry: &CatalogEntry) -> bool {
        let title = entry.title.to_lowercase();
        self.services
            .iter()
            .any(|s| title.contains(&s.to_lowercase()))
    }
}

fn category_roadmap(category: &str) -> Vec<String> {
    let phases: &[&str] = match category {
        "mobile strategy" => &[
            "User research and persona development",
            "Platform strategy (iOS/Android/Cross-platform)",
            "UX/UI design and prototyping",
            "Development and testing",
            "App store optimization and launch",
        ],
        "web presence" => &[
            "Brand analysis and positioning",
            "Information architecture planning",
            "Design and development",
            "Content strategy and SEO",
            "Launch and ongoing optimization",
        ],
        "ecommerce growth" => &[
            "Market analysis and competitive research",
            "Platform selection and architecture",
            "Design and user experience optimization",
            "Payment and security integration",
            "Launch and growth marketing",
        ],
        "api & integration" => &[
            "System analysis and requirements gathering",
            "API design and architecture planning",
            "Development and testing",
            "Documentation and training",
            "Deployment and monitoring",
        ],
        _ => &[
            "Strategic planning and analysis",
            "Solution design and architecture",
            "Implementation and development",
            "Testing and quality assurance",
            "Launch and ongoing support",
        ],
    };
    phases.iter().map(|p| p.to_string()).collect()
}

fn category_timeline(category: &str) -> &'static str {
    match category {
        "mobile strategy" => "12-16 weeks",
        "web presence" => "8-12 weeks",
        "ecommerce growth" => "16-20 weeks",
        "api & integration" => "10-14 weeks",
        "digital transformation" => "20-24 weeks",
        "business strategy" => "4-8 weeks",
        _ => DEFAULT_TIMELINE,
    }
}

fn next_steps(has_recommendations: bool) -> Vec<String> {
    let steps: [&str; 4] = if has_recommendations {
        [
            "Schedule a strategic consultation call",
            "Request a detailed project roadmap",
            "View our strategic case studies",
            "Download our digital transformation guide",
        ]
    } else {
        [
            "Schedule a business strategy session",
            "Request a technology assessment",
            "Download our strategic planning toolkit",
            "Join our digital transformation webinar",
        ]
    };
    steps.iter().map(|s| s.to_string()).collect()
}

fn compose_message(input: &str, recommendations: &[Recommendation], roadmap: &[String]) -> String {
    if recommendations.is_empty() {
        return format!(
            "Based on your description of \"{input}\", I recommend starting with a comprehensive \
business strategy session. This will help us identify the most impactful digital \
transformation opportunities for your organization.

Our strategic approach focuses on:
• Understanding your current business challenges
• Identifying technology gaps and opportunities
• Creating a phased implementation roadmap
• Measuring success and ROI

Let's schedule a strategic consultation to dive deeper into your specific needs and create \
a customized roadmap."
        );
    }

    let services = recommendations
        .iter()
        .map(|r| format!("• {} - {}", r.title, r.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Excellent! Based on your needs around \"{input}\", I've identified several strategic \
opportunities for your business transformation.

🎯 **Strategic Services:**
{services}

{roadmap}

💡 **Strategic Benefits:**
• Aligned with your business objectives
• Scalable and future-proof solutions
• Measurable success metrics
• Ongoing optimization and support

🚀 **Next Steps:**
Let's schedule a strategic consultation to create your customized roadmap and discuss \
implementation strategies.",
        roadmap = roadmap.join("\n"),
    )
}

/// Offline keyword-matching backend.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedBackend {
    latency: Duration,
}

impl RuleBasedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before answering, to exercise loading states in a UI.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Produce recommendations without the simulated latency.
    pub fn recommend(&self, input: &str, context: &AnalysisContext) -> AdvisorResponse {
        let input_lower = input.to_lowercase();
        let roadmap = general_roadmap(&input_lower);

        let mut matched: Vec<Recommendation> = Vec::new();
        for category in CATEGORIES.iter().filter(|c| c.matches_input(&input_lower)) {
            debug!(category = category.label, "Category matched");
            matched.extend(
                context
                    .services
                    .iter()
                    .filter(|entry| category.matches_entry(entry))
                    .map(|entry| Recommendation {
                        service_id: entry.id.clone(),
                        title: entry.title.clone(),
                        description: format!("Perfect for your {} needs", category.label),
                        relevance: MATCHED_RELEVANCE,
                        roadmap: Some(category_roadmap(category.label)),
                        timeline: Some(category_timeline(category.label).to_string()),
                    }),
            );
        }

        if matched.is_empty() {
            matched.extend(context.services.iter().take(GENERIC_PICKS).map(|entry| {
                Recommendation {
                    service_id: entry.id.clone(),
                    title: entry.title.clone(),
                    description: "Could be valuable for your business transformation".to_string(),
                    relevance: GENERIC_RELEVANCE,
                    roadmap: Some(category_roadmap("general")),
                    timeline: Some(DEFAULT_TIMELINE.to_string()),
                }
            }));
        }

        // The message lists everything found; only the returned list is capped.
        let message = compose_message(input, &matched, &roadmap);
        let has_recommendations = !matched.is_empty();
        matched.truncate(MAX_RECOMMENDATIONS);

        AdvisorResponse {
            message,
            recommendations: matched,
            next_steps: next_steps(has_recommendations),
            confidence: if has_recommendations { 0.9 } else { 0.6 },
            roadmap,
            provider: self.name(),
            cost: self.cost(),
        }
    }
}

#[async_trait]
impl AdvisorBackend for RuleBasedBackend {
    fn name(&self) -> String {
        "Mock AI (Demo)".to_string()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn cost(&self) -> CostTier {
        CostTier::Free
    }

    async fn analyze(&self, input: &str, context: &AnalysisContext) -> Result<AdvisorResponse> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.recommend(input, context))
    }
}
