//! Turns free-text model replies into an [`AdvisorResponse`].
//!
//! Normalization never fails. A reply without usable JSON degrades to a
//! response whose message is the whole reply.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::roadmap::default_roadmap;
use super::types::{AdvisorResponse, CostTier, Recommendation};

/// Maximum recommendations kept from a reply.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Confidence used when a reply carries none.
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Next step used when a reply carries none.
pub const FALLBACK_NEXT_STEP: &str = "Schedule a consultation call";

/// Greedy span from the first `{` to the last `}`.
fn json_span(raw: &str) -> Option<&str> {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    let span = SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap());
    span.find(raw).map(|m| m.as_str())
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    })
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn coerce_recommendation(value: &Value) -> Option<Recommendation> {
    let obj = value.as_object()?;
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(Recommendation {
        service_id: text("serviceId"),
        title: text("title"),
        description: text("description"),
        relevance: obj
            .get("relevance")
            .and_then(Value::as_f64)
            .map(|r| r.clamp(0.0, 1.0))
            .unwrap_or(0.0),
        roadmap: string_list(obj.get("roadmap")),
        timeline: obj
            .get("timeline")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Normalizes replies on behalf of one backend identity.
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    provider: String,
    cost: CostTier,
}

impl ResponseNormalizer {
    pub fn new(provider: impl Into<String>, cost: CostTier) -> Self {
        Self {
            provider: provider.into(),
            cost,
        }
    }

    /// Build a response from a raw reply. Never fails.
    pub fn normalize(&self, raw: &str) -> AdvisorResponse {
        let Some(span) = json_span(raw) else {
            debug!(provider = %self.provider, "No JSON object in reply, using fallback");
            return self.fallback(raw);
        };

        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(obj)) => self.from_object(raw, &obj),
            Ok(_) => self.fallback(raw),
            Err(e) => {
                warn!(
                    provider = %self.provider,
                    error = %e,
                    "Failed to parse reply as JSON, using fallback"
                );
                self.fallback(raw)
            }
        }
    }

    fn from_object(&self, raw: &str, obj: &Map<String, Value>) -> AdvisorResponse {
        let mut recommendations: Vec<Recommendation> = obj
            .get("recommendations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(coerce_recommendation).collect())
            .unwrap_or_default();
        recommendations.truncate(MAX_RECOMMENDATIONS);

        AdvisorResponse {
            message: non_empty_str(obj, "message").unwrap_or(raw).to_string(),
            recommendations,
            next_steps: string_list(obj.get("nextSteps"))
                .unwrap_or_else(|| vec![FALLBACK_NEXT_STEP.to_string()]),
            confidence: obj
                .get("confidence")
                .and_then(Value::as_f64)
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_CONFIDENCE),
            roadmap: string_list(obj.get("roadmap")).unwrap_or_else(default_roadmap),
            provider: self.provider.clone(),
            cost: self.cost,
        }
    }

    /// Response used when the reply holds no usable JSON.
    pub fn fallback(&self, raw: &str) -> AdvisorResponse {
        AdvisorResponse {
            message: raw.to_string(),
            recommendations: Vec::new(),
            next_steps: vec![FALLBACK_NEXT_STEP.to_string()],
            confidence: DEFAULT_CONFIDENCE,
            roadmap: default_roadmap(),
            provider: self.provider.clone(),
            cost: self.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn normalizer() -> ResponseNormalizer {
        ResponseNormalizer::new("OpenRouter (test-model)", CostTier::Low)
    }

    #[test]
    fn test_well_formed_reply_is_reproduced() {
        let reply = json!({
            "message": "Strategic analysis",
            "recommendations": [{
                "serviceId": "s1",
                "title": "Mobile App Development",
                "description": "Fits a restaurant",
                "relevance": 0.85,
                "roadmap": ["Phase 1: Discovery", "Phase 2: Build"],
                "timeline": "12-16 weeks"
            }],
            "nextSteps": ["Book a call", "Send a brief"],
            "confidence": 0.8,
            "roadmap": ["Phase 1", "", "Phase 2"],
            "provider": "Injected",
            "cost": "$$"
        });
        let raw = format!("Here you go:\n```json\n{}\n```", reply);

        let response = normalizer().normalize(&raw);

        assert_eq!(response.message, "Strategic analysis");
        assert_eq!(response.recommendations.len(), 1);
        let rec = &response.recommendations[0];
        assert_eq!(rec.service_id, "s1");
        assert_eq!(rec.relevance, 0.85);
        assert_eq!(
            rec.roadmap,
            Some(vec!["Phase 1: Discovery".to_string(), "Phase 2: Build".to_string()])
        );
        assert_eq!(rec.timeline.as_deref(), Some("12-16 weeks"));
        assert_eq!(response.next_steps, vec!["Book a call", "Send a brief"]);
        assert_eq!(response.confidence, 0.8);
        assert_eq!(response.roadmap, vec!["Phase 1", "", "Phase 2"]);
        assert_eq!(response.provider, "OpenRouter (test-model)");
        assert_eq!(response.cost, CostTier::Low);
    }

    #[test]
    fn test_reply_without_braces_falls_back() {
        let raw = "I think you should build an app.";
        let response = normalizer().normalize(raw);

        assert_eq!(response.message, raw);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.next_steps, vec!["Schedule a consultation call"]);
        assert_eq!(response.confidence, 0.7);
        assert_eq!(response.roadmap, default_roadmap());
    }

    #[test]
    fn test_unparseable_span_falls_back() {
        let raw = "Sure! {message: not json} and {more}";
        let response = normalizer().normalize(raw);
        assert_eq!(response, normalizer().fallback(raw));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let raw = r#"Sure! {"message":"Go mobile","confidence":1.4,"recommendations":[]}"#;
        let response = normalizer().normalize(raw);

        assert_eq!(response.confidence, 1.0);
        assert_eq!(response.message, "Go mobile");
        assert!(response.recommendations.is_empty());

        let low = normalizer().normalize(r#"{"confidence": -2}"#);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_malformed_fields_get_defaults() {
        let raw = r#"{"message": 42, "recommendations": "none", "nextSteps": "call",
                      "confidence": "high", "roadmap": {"a": 1}}"#;
        let response = normalizer().normalize(raw);

        assert_eq!(response.message, raw);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.next_steps, vec![FALLBACK_NEXT_STEP]);
        assert_eq!(response.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(response.roadmap, default_roadmap());
    }

    #[test]
    fn test_recommendations_truncated_and_coerced() {
        let recs: Vec<Value> = (0..6)
            .map(|i| json!({"serviceId": format!("s{i}"), "title": "T", "relevance": 3}))
            .collect();
        let mut items = vec![json!("junk")];
        items.extend(recs);
        let raw = json!({"message": "m", "recommendations": items}).to_string();

        let response = normalizer().normalize(&raw);
        assert_eq!(response.recommendations.len(), 4);
        assert_eq!(response.recommendations[0].service_id, "s0");
        assert_eq!(response.recommendations[0].relevance, 1.0);
        assert_eq!(response.recommendations[0].description, "");
    }

    proptest! {
        #[test]
        fn confidence_always_in_unit_interval(c in -1.0e6f64..1.0e6f64) {
            let raw = format!(r#"noise {{"message": "m", "confidence": {}}} noise"#, c);
            let response = normalizer().normalize(&raw);
            prop_assert!((0.0..=1.0).contains(&response.confidence));
        }

        #[test]
        fn normalize_never_panics_and_keeps_identity(raw in ".*") {
            let response = normalizer().normalize(&raw);
            prop_assert_eq!(response.provider, "OpenRouter (test-model)");
            prop_assert!(response.recommendations.len() <= MAX_RECOMMENDATIONS);
        }
    }
}
