//! Prompt construction for the remote completion backends.

use super::types::AnalysisContext;

const NOT_SPECIFIED: &str = "Not specified";

/// System prompt shared by all remote backends.
pub const ADVISOR_SYSTEM_PROMPT: &str = "You are a strategic business advisor specializing in \
digital transformation and technology consulting.
Analyze the user's needs and provide strategic recommendations based on the available services.
Focus on business value, strategic roadmaps, and implementation guidance.
Do NOT provide cost estimates unless specifically requested.";

/// Extra system guidance for reasoning-oriented models.
pub const REASONING_ADDENDUM: &str = "Use your reasoning capabilities to provide thoughtful, \
well-structured strategic insights.";

/// Reply shape the model is asked to follow. `provider` and `cost` are
/// always set locally, so they are not requested.
const RESPONSE_SHAPE: &str = r#"{
  "message": "Strategic analysis message...",
  "recommendations": [
    {
      "serviceId": "service-id",
      "title": "Service Name",
      "description": "Why this service fits their needs",
      "relevance": 0.9,
      "roadmap": ["Phase 1: Discovery", "Phase 2: Design", "Phase 3: Development"],
      "timeline": "8-12 weeks"
    }
  ],
  "nextSteps": ["Schedule consultation", "Request detailed roadmap"],
  "confidence": 0.85,
  "roadmap": ["Phase 1: Discovery & Strategy", "Phase 2: Design & Architecture", "Phase 3: Development & Implementation", "Phase 4: Launch & Growth"]
}"#;

/// Catalog as a bulleted list, one `- title: description` line per entry.
pub fn catalog_list(context: &AnalysisContext) -> String {
    context
        .services
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Earlier replies as a section preceding the instructions; empty when
/// there are none.
fn conversation_section(context: &AnalysisContext) -> String {
    if context.previous_responses.is_empty() {
        return String::new();
    }

    let replies = context
        .previous_responses
        .iter()
        .map(|r| format!("- {}", r.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\nPrevious Advisor Responses:\n{replies}\n")
}

/// Build the user prompt for an analysis request.
pub fn build_prompt(input: &str, context: &AnalysisContext) -> String {
    let field = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    };

    format!(
        r#"User Input: "{input}"

Available Services:
{services}

User Context:
- Industry: {industry}
- Budget: {budget}
- Timeline: {timeline}
{conversation}
Please provide a strategic analysis with the following structure:

1. **Strategic Analysis**: Analyze their business needs and opportunities
2. **Service Recommendations**: Recommend specific services with relevance scores (0.0-1.0)
3. **Implementation Roadmap**: Create a phased implementation plan
4. **Strategic Benefits**: Highlight business value and ROI
5. **Next Steps**: Provide actionable next steps

Format your response as JSON with this exact structure:
{shape}

Ensure the JSON is valid and complete."#,
        services = catalog_list(context),
        industry = field(&context.user_industry),
        budget = field(&context.user_budget),
        timeline = field(&context.user_timeline),
        conversation = conversation_section(context),
        shape = RESPONSE_SHAPE,
    )
}
