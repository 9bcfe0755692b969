//! Generation client against a mocked Gemini endpoint.

use replymate::llm::{GeminiClient, GenerateError, ReplyGenerator, GEMINI_MODEL};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn generate_path() -> String {
    format!("/v1beta/models/{}:generateContent", GEMINI_MODEL)
}

#[tokio::test]
async fn success_text_is_extracted_and_trimmed() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": "  hello  "}]}}]
    });
    Mock::given(matchers::method("POST"))
        .and(matchers::path(generate_path()))
        .and(matchers::query_param("key", "k-123"))
        .and(matchers::body_json(serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "the prompt"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(server.uri());
    let text = client.generate("the prompt", "k-123").await.unwrap();
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn non_success_status_is_an_upstream_error_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(generate_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(server.uri());
    let err = client.generate("the prompt", "k-123").await.unwrap_err();
    match &err {
        GenerateError::Upstream { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "backend exploded");
        }
        other => panic!("expected Upstream, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("500"));
    assert!(message.contains("backend exploded"));
}

#[tokio::test]
async fn empty_api_key_fails_without_any_network_call() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(server.uri());
    let err = client.generate("the prompt", "").await.unwrap_err();
    assert!(matches!(err, GenerateError::MissingCredential));
    // dropping the server verifies the expect(0)
}

#[tokio::test]
async fn structurally_missing_candidates_degrade_to_empty_string() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(generate_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(server.uri());
    let text = client.generate("the prompt", "k-123").await.unwrap();
    assert_eq!(text, "");
}
