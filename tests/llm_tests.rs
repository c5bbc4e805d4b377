//! LLM client tests against mocked provider APIs
//!
//! wiremock stands in for the OpenAI and Ollama HTTP endpoints, so these
//! tests exercise the real clients without network access.

use eda::llm::{LLMClient, Provider, ProviderRegistry};
use eda::utils::toml_config::{ModelConfig, ProviderConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============= Helper Functions =============

/// Create a mock OpenAI chat completion response
fn openai_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop",
            "logprobs": null
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    })
}

/// Create a mock Ollama chat response
fn ollama_response(content: &str) -> Value {
    json!({
        "model": "llama3.2",
        "created_at": "2024-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

fn ollama_registry(base_url: &str) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register_provider(
        "local",
        ProviderConfig::Ollama {
            base_url: base_url.to_string(),
        },
    );
    registry.register_model(
        "fast",
        ModelConfig {
            provider: "local".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.0,
            max_tokens: None,
        },
    );
    registry
}

// ============= OpenAI =============

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_generate_with_system() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_response("[\"Q1\"]")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::OpenAI {
        api_key: "test-key".to_string(),
        api_base: server.uri(),
        model: "gpt-4".to_string(),
        temperature: 0.0,
        max_tokens: Some(512),
    };
    let client = provider.create_client().await.unwrap();

    let answer = client
        .generate_with_system("You are Business Analyst.", "Generate questions")
        .await
        .unwrap();
    assert_eq!(answer, "[\"Q1\"]");
    assert_eq!(client.model_name(), "gpt-4");

    let bodies = request_bodies(&server).await;
    let body = &bodies[0];
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["max_completion_tokens"], 512);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You are Business Analyst.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "Generate questions");
}

#[cfg(feature = "openai")]
#[tokio::test]
async fn test_openai_api_error_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let provider = Provider::OpenAI {
        api_key: "wrong".to_string(),
        api_base: server.uri(),
        model: "gpt-4".to_string(),
        temperature: 0.0,
        max_tokens: None,
    };
    let client = provider.create_client().await.unwrap();

    let err = client.generate("hello").await.unwrap_err();
    assert!(matches!(err, eda::AppError::LLM(_)));
    assert!(err.to_string().contains("Incorrect API key"));
}

// ============= Ollama =============

#[cfg(feature = "ollama")]
#[tokio::test]
async fn test_ollama_generate_through_registry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_response("- insight")))
        .expect(1)
        .mount(&server)
        .await;

    let registry = ollama_registry(&server.uri());
    let client = registry.create_client_for_model("fast").await.unwrap();

    let answer = client
        .generate_with_system("You are Narrator Agent.", "Summarize")
        .await
        .unwrap();
    assert_eq!(answer, "- insight");

    let bodies = request_bodies(&server).await;
    let body = &bodies[0];
    assert_eq!(body["model"], "llama3.2");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "Summarize");
    assert_eq!(body["options"]["temperature"], 0.0);
}

#[cfg(feature = "ollama")]
#[tokio::test]
async fn test_ollama_server_error_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = ollama_registry(&server.uri())
        .create_client_for_model("fast")
        .await
        .unwrap();

    let err = client.generate("hello").await.unwrap_err();
    assert!(matches!(err, eda::AppError::LLM(_)));
}

#[tokio::test]
async fn test_unknown_model_is_configuration_error() {
    let registry = ollama_registry("http://localhost:11434");
    let result = registry.create_client_for_model("smart").await;
    assert!(matches!(result, Err(eda::AppError::Configuration(_))));
}
