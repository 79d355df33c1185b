//! Mock API tests for key rotation over real HTTP.
//!
//! These use wiremock to simulate the generative endpoints, keying each mock
//! off the `x-goog-api-key` header so a specific key can be driven into
//! quota failure while another succeeds.

use longan::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quota_error_body() -> serde_json::Value {
    json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    })
}

fn auth_error_body() -> serde_json::Value {
    json!({
        "error": {
            "code": 401,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "UNAUTHENTICATED"
        }
    })
}

fn imagen_ok_body() -> serde_json::Value {
    json!({
        "predictions": [
            {"bytesBase64Encoded": "T0s=", "mimeType": "image/png"}
        ]
    })
}

fn client_for(server: &MockServer, keys: &str) -> StudioClient {
    StudioClient::builder()
        .api_keys(keys)
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn quota_failure_rotates_to_the_next_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:predict$"))
        .and(header("x-goog-api-key", "k1"))
        .respond_with(ResponseTemplate::new(429).set_body_json(quota_error_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:predict$"))
        .and(header("x-goog-api-key", "k2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(imagen_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1,k2");
    let images = client.generate_images("a cat", 1, "1:1").await.unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].data, b"OK");
    // The pool remembers the key that worked.
    assert_eq!(client.key_pool().cursor(), 1);
}

#[tokio::test]
async fn exhausting_every_key_reports_the_pool_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:predict$"))
        .respond_with(ResponseTemplate::new(429).set_body_json(quota_error_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1,k2");
    let err = client.generate_images("a cat", 1, "1:1").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::QuotaExhaustedAll);
    assert!(err.user_message().contains("All 2 API keys"));
}

#[tokio::test]
async fn auth_failure_stops_without_rotating() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:predict$"))
        .respond_with(ResponseTemplate::new(401).set_body_json(auth_error_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1,k2");
    let err = client.generate_images("a cat", 1, "1:1").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Auth);
    assert!(err.user_message().starts_with("Authentication error"));
    assert_eq!(client.key_pool().cursor(), 0);
}

#[tokio::test]
async fn overloaded_service_surfaces_immediately() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1,k2");
    let err = client.elaborate_prompt("an idea").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Unavailable);
}

#[tokio::test]
async fn empty_pool_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "");
    let err = client.generate_images("a cat", 1, "1:1").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Config);
}

#[tokio::test]
async fn blank_translation_input_short_circuits() {
    let server = MockServer::start().await;

    // No request of any kind may reach the server.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1");
    let translated = client.translate("   ", "en").await.unwrap();

    assert_eq!(translated, "");
}

#[tokio::test]
async fn translation_returns_trimmed_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:generateContent$"))
        .and(header("x-goog-api-key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "  Xin chào  "}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1");
    let translated = client.translate("hello", "vi").await.unwrap();

    assert_eq!(translated, "Xin chào");
}

#[tokio::test]
async fn keys_can_be_replaced_between_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/.*:predict$"))
        .and(header("x-goog-api-key", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(imagen_ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "stale");
    client.key_pool().set_keys("fresh");

    let images = client.generate_images("a cat", 1, "1:1").await.unwrap();
    assert_eq!(images[0].data, b"OK");
}
