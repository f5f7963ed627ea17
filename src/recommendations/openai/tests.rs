use super::*;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn config_for(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig {
        base_url: format!("{}/v1", server.uri()),
        ..OpenAiConfig::default()
    }
}

#[test]
fn client_configuration() {
    let config = OpenAiConfig {
        base_url: "http://test-host:1234/v1/".to_string(),
        model: "test-model".to_string(),
        ..OpenAiConfig::default()
    };
    let client = OpenAiClient::new(&config, "sk-test").expect("Failed to create client");

    assert_eq!(client.model(), "test-model");
    assert_eq!(client.base_url.as_str(), "http://test-host:1234/v1/");
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
}

#[test]
fn invalid_base_url_is_config_error() {
    let config = OpenAiConfig {
        base_url: "not a url".to_string(),
        ..OpenAiConfig::default()
    };

    assert!(matches!(
        OpenAiClient::new(&config, "sk-test"),
        Err(AdvisorError::Config(ConfigError::InvalidUrl(_)))
    ));
}

#[test]
fn user_message() {
    let message = ChatMessage::user("hello");
    assert_eq!(message.role, "user");
    assert_eq!(message.content, "hello");
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_returns_content_verbatim() {
    let server = MockServer::start().await;
    let reply = "1. **Keywords**\n| keyword | intent |\n";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.4,
            "messages": [{"role": "user", "content": "Analyse this page"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": reply}, "finish_reason": "stop"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server), "sk-test").expect("client is created");
    let content = tokio::task::spawn_blocking(move || client.complete("Analyse this page"))
        .await
        .expect("blocking task should complete")
        .expect("completion should succeed");

    assert_eq!(content, reply);
}

#[tokio::test(flavor = "multi_thread")]
async fn api_error_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server), "sk-wrong").expect("client is created");
    let result = tokio::task::spawn_blocking(move || client.complete("prompt"))
        .await
        .expect("blocking task should complete");

    match result {
        Err(AdvisorError::Request(message)) => {
            assert_eq!(message, "HTTP 401: Incorrect API key provided.");
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_choices_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server), "sk-test").expect("client is created");
    let result = tokio::task::spawn_blocking(move || client.complete("prompt"))
        .await
        .expect("blocking task should complete");

    assert!(matches!(result, Err(AdvisorError::Request(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&config_for(&server), "sk-test")
        .expect("client is created")
        .with_timeout(Duration::from_millis(200));
    let result = tokio::task::spawn_blocking(move || client.complete("prompt"))
        .await
        .expect("blocking task should complete");

    match result {
        Err(AdvisorError::Request(message)) => assert!(message.starts_with("Transport error")),
        other => panic!("expected request error, got {other:?}"),
    }
}
