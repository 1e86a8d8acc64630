//! Wiremock tests for [`LlmDiagnosisProvider`].
//!
//! An Ollama backend is pointed at a mock server so the full `llm` request
//! and error path runs without network access or API keys.

use mimir::provider::{LlmDiagnosisProvider, ProviderBackend};
use mimir::{DiagnosisProvider, ProviderError};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "llama3";

/// Non-streaming Ollama `/api/chat` reply carrying `content`.
fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": MODEL,
        "created_at": "2024-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

fn provider_for(server: &MockServer) -> LlmDiagnosisProvider {
    LlmDiagnosisProvider::new(ProviderBackend::Ollama, None::<String>)
        .base_url(server.uri())
        .timeout_secs(5)
}

#[tokio::test]
async fn reply_text_is_returned() {
    let server = MockServer::start().await;
    let reply = r#"{"bias_score": -0.6, "strength_score": 0.7, "comment": "保守的です。"}"#;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(reply)))
        .expect(1)
        .mount(&server)
        .await;

    let text = provider_for(&server)
        .complete("prompt", MODEL)
        .await
        .expect("reply should be returned");
    assert_eq!(text, reply);
}

#[tokio::test]
async fn empty_reply_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("  ")))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete("prompt", MODEL)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse), "{err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn unauthorized_is_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete("prompt", MODEL)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationFailed), "{err:?}");
    assert!(!err.is_transient());
}

#[tokio::test]
async fn too_many_requests_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete("prompt", MODEL)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited { .. }), "{err:?}");
}

#[tokio::test]
async fn provider_failure_reaches_diagnoser_as_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let diagnoser = mimir::Diagnoser::builder()
        .provider(std::sync::Arc::new(provider_for(&server)))
        .model(MODEL)
        .build()
        .unwrap();
    let mut ledger = mimir::SessionLedger::default();
    let err = diagnoser
        .diagnose(&mut ledger, "防衛費はもっと増やすべきだ", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        mimir::MimirError::Provider(ProviderError::AuthenticationFailed)
    ));
    assert_eq!(ledger.usage_count(), 1);
    assert!(ledger.history().is_empty());
}
