//! Mock API tests for video generation.
//!
//! Covers the long-running operation flow: `models/{model}:predictLongRunning`
//! returns an operation name, which is polled via `GET /{name}` with the same
//! key until done.

use std::sync::Mutex;
use std::time::Duration;

use longan::polling::progress;
use longan::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pending_operation(name: &str) -> serde_json::Value {
    json!({"name": name, "done": false})
}

fn done_operation(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "done": true,
        "response": {
            "generateVideoResponse": {
                "generatedSamples": [
                    {"video": {"uri": "https://host/v1main/files/vid-1:download?alt=media"}}
                ]
            }
        }
    })
}

fn quota_error_body() -> serde_json::Value {
    json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted (e.g. check quota).",
            "status": "RESOURCE_EXHAUSTED"
        }
    })
}

fn client_for(server: &MockServer, keys: &str) -> StudioClient {
    StudioClient::builder()
        .api_keys(keys)
        .base_url(server.uri())
        .poll_interval(Duration::from_millis(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn video_generation_polls_to_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"/models/veo-.*:predictLongRunning$"))
        .and(header("x-goog-api-key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_operation("operations/op-123")))
        .expect(1)
        .mount(&server)
        .await;

    // First status check still pending, second one done.
    Mock::given(method("GET"))
        .and(path("/operations/op-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_operation("operations/op-123")))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-123"))
        .and(header("x-goog-api-key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(done_operation("operations/op-123")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1");
    let messages: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let sink = |message: &str| messages.lock().unwrap().push(message.to_string());

    let links = client
        .generate_videos("a slow ocean wave", None, 1, &sink)
        .await
        .unwrap();

    // The download link is rewritten onto the public API surface.
    assert_eq!(
        links,
        vec!["https://host/v1beta/files/vid-1:download?alt=media".to_string()]
    );

    let messages = messages.lock().unwrap();
    assert_eq!(messages[0], progress::STARTING);
    assert_eq!(messages[1], progress::SUBMITTED);
    assert_eq!(
        messages
            .iter()
            .filter(|message| *message == progress::CHECKING)
            .count(),
        2
    );
    assert_eq!(messages.last().map(String::as_str), Some(progress::DONE));
}

#[tokio::test]
async fn quota_on_start_restarts_the_operation_on_the_next_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r":predictLongRunning$"))
        .and(header("x-goog-api-key", "k1"))
        .respond_with(ResponseTemplate::new(429).set_body_json(quota_error_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r":predictLongRunning$"))
        .and(header("x-goog-api-key", "k2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending_operation("operations/op-9")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-9"))
        .and(header("x-goog-api-key", "k2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(done_operation("operations/op-9")))
        .mount(&server)
        .await;

    let client = client_for(&server, "k1,k2");
    let messages: Mutex<Vec<String>> = Mutex::new(Vec::new());
    let sink = |message: &str| messages.lock().unwrap().push(message.to_string());

    let links = client
        .generate_videos("a slow ocean wave", None, 1, &sink)
        .await
        .unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(client.key_pool().cursor(), 1);
    // The whole operation restarted on the second key.
    let starts = messages
        .lock()
        .unwrap()
        .iter()
        .filter(|message| *message == progress::STARTING)
        .count();
    assert_eq!(starts, 2);
}

#[tokio::test]
async fn done_with_no_links_is_content_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r":predictLongRunning$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operations/op-0",
            "done": true,
            "response": {"generateVideoResponse": {"generatedSamples": []}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, "k1");
    let err = client
        .generate_videos("a slow ocean wave", None, 1, &|_| {})
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::ContentRejected);
    assert!(err.user_message().contains("no download links"));
}

#[tokio::test]
async fn seed_image_is_sent_inline_with_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r":predictLongRunning$"))
        .and(wiremock::matchers::body_partial_json(json!({
            "instances": [{
                "prompt": "bring this to life",
                "image": {"imageBytes": "AQID", "mimeType": "image/png"}
            }],
            "parameters": {"sampleCount": 2}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(done_operation("operations/op-7")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "k1");
    let image = MediaInput::new("seed.png", vec![1u8, 2, 3], "image/png");
    let links = client
        .generate_videos("bring this to life", Some(&image), 2, &|_| {})
        .await
        .unwrap();

    assert_eq!(links.len(), 1);
}
