//! Remote backends and the CMS client against a loopback stub server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use advisor_core::advisor::{OpenAiBackend, OpenRouterBackend};
use advisor_core::content::{SanityClient, SanityConfig};
use advisor_core::{
    AdvisorAgent, AdvisorBackend, AnalysisContext, BackendConfig, CatalogEntry, ContentStore,
    ContextOverrides, CostTier, Error, FallbackContentStore, StaticContentStore,
};

const GOOD_KEY: &str = "sk-good";

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {GOOD_KEY}");
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    stub.requests.lock().unwrap().push((headers, body));

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API key"}})),
        );
    }

    let content = json!({
        "message": "A mobile app will help your diners book tables.",
        "recommendations": [
            {"serviceId": "service-3", "title": "Mobile Development", "description": "Booking app", "relevance": 1.7},
            "not an object"
        ],
        "nextSteps": ["Book a discovery call"],
        "confidence": 0.85,
        "roadmap": ["Phase 1: Discovery"]
    });
    let reply = format!("Here is my analysis:\n{content}\nHope this helps.");

    (
        StatusCode::OK,
        Json(json!({"choices": [{"message": {"role": "assistant", "content": reply}}]})),
    )
}

async fn models() -> Json<Value> {
    Json(json!({
        "data": [
            {"id": "deepseek/deepseek-r1-0528:free", "name": "DeepSeek R1", "pricing": {"prompt": "0"}},
            {"id": "mystery/model"}
        ]
    }))
}

async fn cms_query(State(stub): State<Stub>, RawQuery(query): RawQuery) -> Json<Value> {
    stub.queries.lock().unwrap().push(query.unwrap_or_default());
    Json(json!({
        "result": [
            {"_id": "svc-app", "title": "Mobile App Development", "description": "Native apps"},
            {"_id": "svc-web", "title": "Website Development"},
            {"title": "Untitled draft"}
        ]
    }))
}

async fn spawn_stub() -> (SocketAddr, Stub) {
    let stub = Stub::default();
    let router = Router::new()
        .route("/v1/chat/completions", post(completions))
        .route("/v1/models", get(models))
        .route("/cms/query", get(cms_query))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, stub)
}

fn catalog() -> AnalysisContext {
    AnalysisContext::new(vec![CatalogEntry::new(
        "service-3",
        "Mobile Development",
        "Cross-platform apps",
    )])
    .with_industry("Restaurant & Hospitality")
}

#[tokio::test]
async fn test_openai_reply_is_normalized() {
    let (addr, stub) = spawn_stub().await;
    let backend = OpenAiBackend::new(BackendConfig::new("openai").with_api_key(GOOD_KEY))
        .with_base_url(format!("http://{addr}/v1/"));

    let response = backend
        .analyze("We want customers to book tables from their phones", &catalog())
        .await
        .unwrap();

    assert_eq!(response.message, "A mobile app will help your diners book tables.");
    assert_eq!(response.recommendations.len(), 1);
    assert_eq!(response.recommendations[0].relevance, 1.0);
    assert_eq!(response.next_steps, vec!["Book a discovery call".to_string()]);
    assert_eq!(response.confidence, 0.85);
    assert_eq!(response.provider, "OpenAI GPT-4");
    assert_eq!(response.cost, CostTier::High);

    let requests = stub.requests.lock().unwrap();
    let (_, body) = &requests[0];
    assert_eq!(body["model"], "gpt-4-turbo-preview");
    assert_eq!(body["max_tokens"], 1500);
    assert!(body.get("stream").is_none());
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("Mobile Development"));
    assert!(prompt.contains("Restaurant & Hospitality"));
}

#[tokio::test]
async fn test_rejected_key_surfaces_backend_error() {
    let (addr, _stub) = spawn_stub().await;
    let backend = OpenRouterBackend::new(BackendConfig::new("openrouter").with_api_key("sk-bad"))
        .with_base_url(format!("http://{addr}/v1"));

    let err = backend.analyze("hello", &catalog()).await.unwrap_err();

    assert!(err.is_backend());
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_openrouter_sends_attribution_headers() {
    let (addr, stub) = spawn_stub().await;
    let backend = OpenRouterBackend::new(
        BackendConfig::new("openrouter")
            .with_api_key(GOOD_KEY)
            .with_temperature(0.0),
    )
    .with_base_url(format!("http://{addr}/v1"))
    .with_site("https://advisor.example", "Advisor Tests");

    let response = backend.analyze("hello", &catalog()).await.unwrap();
    assert_eq!(response.provider, "OpenRouter (deepseek/deepseek-r1-0528:free)");
    assert_eq!(response.cost, CostTier::Free);

    let requests = stub.requests.lock().unwrap();
    let (headers, body) = &requests[0];
    assert_eq!(headers["http-referer"], "https://advisor.example");
    assert_eq!(headers["x-title"], "Advisor Tests");
    assert_eq!(body["stream"], false);
    assert_eq!(body["temperature"], 0.0);
}

#[tokio::test]
async fn test_openrouter_lists_models() {
    let (addr, _stub) = spawn_stub().await;
    let backend = OpenRouterBackend::new(BackendConfig::new("openrouter").with_api_key(GOOD_KEY))
        .with_base_url(format!("http://{addr}/v1"));

    let models = backend.list_models().await;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "DeepSeek R1");
    assert_eq!(models[0].cost, CostTier::Low);
    assert_eq!(models[1].name, "mystery/model");
    assert_eq!(models[1].cost, CostTier::High);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = OpenAiBackend::new(BackendConfig::new("openai").with_api_key(GOOD_KEY))
        .with_base_url(format!("http://{addr}/v1"));

    let err = backend.analyze("hello", &catalog()).await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.is_backend());
}

#[tokio::test]
async fn test_cms_catalog_feeds_rule_based_agent() {
    let (addr, stub) = spawn_stub().await;
    let cms = SanityClient::new(SanityConfig::new("test-project"))
        .with_query_url(format!("http://{addr}/cms/query"));

    let services = cms.fetch_services().await.unwrap();
    assert_eq!(services.len(), 2);
    assert!(stub.queries.lock().unwrap()[0].starts_with("query="));

    let agent = AdvisorAgent::new(Arc::new(cms), &BackendConfig::new("mock"));
    agent.initialize().await;

    let response = agent
        .analyze_need(
            "I run a restaurant and need a mobile app for reservations",
            ContextOverrides::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.confidence, 0.9);
    assert_eq!(response.recommendations[0].service_id, "svc-app");
    assert_eq!(response.recommendations[0].timeline.as_deref(), Some("12-16 weeks"));
}

#[tokio::test]
async fn test_unreachable_cms_falls_back_to_static_services() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cms = SanityClient::new(SanityConfig::new("test-project"))
        .with_query_url(format!("http://{addr}/cms/query"));
    assert!(matches!(
        cms.fetch_services().await.unwrap_err(),
        Error::Content(_)
    ));

    let store = FallbackContentStore::new(Arc::new(cms), Arc::new(StaticContentStore::new()));
    let services = store.fetch_services().await.unwrap();
    assert_eq!(services.len(), 4);
}
