#![allow(clippy::expect_used, clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use radar_api_client::CompletionApi;
use radar_api_client::CompletionClient;
use radar_api_client::Error;
use radar_api_client::Prompt;
use radar_api_client::ProviderInfo;
use radar_api_client::WireApi;
use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn provider(server: &MockServer, wire_api: WireApi) -> ProviderInfo {
    ProviderInfo {
        name: "mock".to_string(),
        base_url: Some(format!("{}/v1beta", server.uri())),
        default_model: None,
        wire_api,
        env_key: None,
        env_key_instructions: None,
        experimental_api_key: Some("test-key".to_string()),
        api_key_header: Some("x-goog-api-key".to_string()),
        query_params: None,
        http_headers: None,
        env_http_headers: None,
        request_max_retries: Some(2),
        request_timeout_ms: Some(5_000),
    }
}

fn generate_content_body(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" } }
        ]
    })
}

#[tokio::test]
async fn generate_content_round_trip_sends_key_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "contents": [ { "parts": [ { "text": "list issues" } ] } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_body("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(provider(&server, WireApi::GenerateContent))
        .expect("client builds");
    let text = client
        .complete(&Prompt::new("gemini-2.0-flash", "list issues"))
        .await
        .expect("completion succeeds");

    assert_eq!(text, "[]");
}

#[tokio::test]
async fn chat_wire_uses_bearer_auth_without_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [ { "message": { "role": "assistant", "content": "[1]" } } ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut provider = provider(&server, WireApi::Chat);
    provider.api_key_header = None;
    let client = CompletionClient::new(provider).expect("client builds");

    let text = client
        .complete(&Prompt::new("llama3.2", "hi"))
        .await
        .expect("completion succeeds");
    assert_eq!(text, "[1]");
}

#[tokio::test]
async fn server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(provider(&server, WireApi::GenerateContent))
        .expect("client builds");
    let text = client
        .complete(&Prompt::new("m", "p"))
        .await
        .expect("second attempt succeeds");

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn unauthorized_fails_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(provider(&server, WireApi::GenerateContent))
        .expect("client builds");
    let err = client
        .complete(&Prompt::new("m", "p"))
        .await
        .expect_err("401 is permanent");

    match err {
        Error::UnexpectedStatus { status, body } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, "API key not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn persistent_server_errors_exhaust_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let mut provider = provider(&server, WireApi::GenerateContent);
    provider.request_max_retries = Some(1);
    let client = CompletionClient::new(provider).expect("client builds");

    let err = client
        .complete(&Prompt::new("m", "p"))
        .await
        .expect_err("retries exhausted");
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn missing_env_key_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut provider = provider(&server, WireApi::GenerateContent);
    provider.experimental_api_key = None;
    provider.env_key = Some("RADAR_TEST_ENV_THAT_IS_NEVER_SET".to_string());
    let client = CompletionClient::new(provider).expect("client builds");

    let err = client
        .complete(&Prompt::new("m", "p"))
        .await
        .expect_err("key missing");
    assert!(matches!(err, Error::MissingEnvVar { .. }));
}
