//! Wire-level tests for the Anthropic Messages adapter.

use serde_json::{Value, json};
use whispr_core::{ApiKey, Attachment, ConversationContext, ConversationTurn};
use whispr_fetch::{ChatAdapter, ChatError, HttpClient, RetryOrchestrator, RetryPolicy};
use whispr_providers::prompt::{DEFAULT_SYSTEM_PROMPT, MULTIMODAL_SYSTEM_PROMPT};
use whispr_providers::{AnthropicAdapter, anthropic_config};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    }))
}

fn new_adapter(server: &MockServer) -> AnthropicAdapter {
    AnthropicAdapter::new(
        anthropic_config(),
        ApiKey::new("sk-ant-test"),
        HttpClient::new().unwrap(),
    )
    .with_base_url(server.uri())
}

async fn first_body(server: &MockServer) -> Value {
    server.received_requests().await.unwrap()[0]
        .body_json()
        .unwrap()
}

#[tokio::test]
async fn test_empty_context_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(message("Hello!"))
        .expect(1)
        .mount(&server)
        .await;

    let reply = new_adapter(&server)
        .generate("Hi", &ConversationContext::new())
        .await
        .unwrap();
    assert_eq!(reply, "Hello!");

    let body = first_body(&server).await;
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["system"], DEFAULT_SYSTEM_PROMPT);
    assert_eq!(body["messages"], json!([{"role": "user", "content": "Hi"}]));
}

#[tokio::test]
async fn test_history_alternates_roles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(message("ok"))
        .mount(&server)
        .await;

    let context = ConversationContext::from_turns([ConversationTurn::new("q1", "a1")]);
    new_adapter(&server).generate("q2", &context).await.unwrap();

    let body = first_body(&server).await;
    assert_eq!(
        body["messages"],
        json!([
            {"role": "user", "content": "q1"},
            {"role": "assistant", "content": "a1"},
            {"role": "user", "content": "q2"}
        ])
    );
}

#[tokio::test]
async fn test_multimodal_block_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(message("Looks like a chart."))
        .mount(&server)
        .await;

    let files = [
        Attachment::new("data.csv", "text/csv", "YSxi"),
        Attachment::new("report.pdf", "application/pdf", "JVBERi0="),
        Attachment::new("chart.jpg", "image/jpeg", "/9j/4AAQ"),
    ];
    let mut adapter = new_adapter(&server);
    adapter.set_custom_system_prompt(Some("You review reports.".to_string()));
    adapter
        .generate_multimodal("Check these", &files, &ConversationContext::new())
        .await
        .unwrap();

    let body = first_body(&server).await;
    let system = body["system"].as_str().unwrap();
    assert!(system.starts_with("You review reports."));
    assert!(system.ends_with("you can analyze images and documents."));
    assert_ne!(system, MULTIMODAL_SYSTEM_PROMPT);

    assert_eq!(
        body["messages"][0]["content"],
        json!([
            {"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "/9j/4AAQ"}},
            {"type": "document", "source": {"type": "base64", "media_type": "application/pdf", "data": "JVBERi0="}},
            {"type": "text", "text": "Check these [File: data.csv]"}
        ])
    );
}

#[tokio::test]
async fn test_overloaded_error_carries_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&server)
        .await;

    let err = new_adapter(&server)
        .generate("hi", &ConversationContext::new())
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        ChatError::Upstream { status: 529, message } if message == "Overloaded (overloaded_error)"
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_credit_balance_is_quota_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "type": "error",
            "error": {
                "type": "invalid_request_error",
                "message": "Your credit balance is too low to access the Anthropic API."
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut adapter = new_adapter(&server);
    let err = RetryOrchestrator::new(RetryPolicy::default().no_backoff())
        .generate(&mut adapter, "hi", &ConversationContext::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::QuotaUpstream(_)));
}

#[tokio::test]
async fn test_unparseable_body_uses_status_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = new_adapter(&server)
        .generate("hi", &ConversationContext::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ChatError::Upstream { status: 500, message } if message == "API request failed with status 500"
    ));
}
