//! Integration tests for the conversation HTTP API.
//!
//! Drives the full router (routes, layers, fallback) with a mock model
//! provider and checks both responses and the session they leave behind.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures::future::join_all;
use serde_json::{json, Value};
use tower::ServiceExt;

use chat_relay::adapters::ai::MockAIProvider;
use chat_relay::adapters::http::{app_router, ConversationAppState, HttpOptions};
use chat_relay::application::ConversationSession;
use chat_relay::bootstrap::build_app_with_provider;
use chat_relay::config::{Environment, ServerConfig};
use chat_relay::ports::AIError;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    session: Arc<ConversationSession>,
    provider: MockAIProvider,
}

impl TestApp {
    fn new(provider: MockAIProvider) -> Self {
        Self::with_options(provider, HttpOptions::default(), false)
    }

    fn with_options(provider: MockAIProvider, options: HttpOptions, expose: bool) -> Self {
        let session = Arc::new(ConversationSession::new(Arc::new(provider.clone())));
        let state = ConversationAppState::new(session.clone()).with_error_details(expose);
        Self {
            router: app_router(state, &options),
            session,
            provider,
        }
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn prompt(&self, prompt: &str) -> (StatusCode, Value) {
        self.post_json("/api/v1/generate_response", json!({ "prompt": prompt }))
            .await
    }

    fn prompt_owned(
        &self,
        prompt: String,
    ) -> impl std::future::Future<Output = (StatusCode, Value)> {
        let router = self.router.clone();
        async move {
            send(
                router,
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/generate_response")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "prompt": prompt }).to_string()))
                    .unwrap(),
            )
            .await
        }
    }

    async fn reset(&self) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/generate_response/reset")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(self.router.clone(), request).await
    }
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn history_len(body: &Value) -> usize {
    body["data"]["conversation"]["history"]
        .as_array()
        .map(Vec::len)
        .unwrap_or(0)
}

fn unavailable() -> AIError {
    AIError::unavailable("upstream overloaded")
}

// =============================================================================
// POST /api/v1/generate_response
// =============================================================================

#[tokio::test]
async fn first_prompt_returns_reply_and_two_message_history() {
    let app = TestApp::new(MockAIProvider::new().with_reply("Hi there!"));

    let (status, body) = app.prompt("Hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "Hi there!");
    assert_eq!(
        body["data"]["conversation"]["currentMessage"],
        json!({"role": "model", "content": "Hi there!"})
    );
    assert_eq!(history_len(&body), 2);
    assert_eq!(
        body["data"]["conversation"]["history"][0],
        json!({"role": "user", "content": "Hello"})
    );
}

#[tokio::test]
async fn history_accumulates_and_is_sent_to_provider() {
    let app = TestApp::new(
        MockAIProvider::new()
            .with_reply("first reply")
            .with_reply("second reply"),
    );

    app.prompt("first").await;
    let (status, body) = app.prompt("second").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(history_len(&body), 4);
    assert_eq!(
        body["data"]["conversation"]["history"][3],
        json!({"role": "model", "content": "second reply"})
    );

    let calls = app.provider.requests();
    assert_eq!(calls[1].history.len(), 2);
    assert_eq!(calls[1].prompt, "second");
}

#[tokio::test]
async fn prompt_is_stored_verbatim() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.prompt("  spaced out\n").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["conversation"]["history"][0]["content"],
        "  spaced out\n"
    );
}

#[tokio::test]
async fn empty_prompt_is_rejected_and_transcript_untouched() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app.prompt("").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("empty"));
    assert!(app.session.is_empty().await);
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn too_long_prompt_is_rejected_and_transcript_untouched() {
    let app = TestApp::new(MockAIProvider::new());
    app.prompt("warm up").await;

    let (status, body) = app.prompt(&"x".repeat(5000)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("longer than 4000"));
    assert_eq!(app.session.len().await, 2);
}

#[tokio::test]
async fn prompt_at_limit_is_accepted() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, _) = app.prompt(&"x".repeat(4000)).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_and_mistyped_prompts_are_rejected() {
    let app = TestApp::new(MockAIProvider::new());

    let cases = [
        (json!({}), "required"),
        (json!({"prompt": null}), "required"),
        (json!({"prompt": 42}), "must be a string"),
        (json!({"prompt": ["Hello"]}), "must be a string"),
        (json!({"prompt": "   "}), "empty"),
    ];

    for (payload, expected) in cases {
        let (status, body) = app.post_json("/api/v1/generate_response", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["message"].as_str().unwrap().contains(expected),
            "message {:?} should contain {:?}",
            body["message"],
            expected
        );
    }

    assert!(app.session.is_empty().await);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/generate_response")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"prompt\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not valid JSON"));
    assert!(app.session.is_empty().await);
}

#[tokio::test]
async fn body_without_json_content_type_is_missing_prompt() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/generate_response")
                .body(Body::from("prompt=Hello"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "'prompt' field is required");
}

#[tokio::test]
async fn provider_failure_is_500_and_transcript_untouched() {
    let app = TestApp::new(
        MockAIProvider::new()
            .with_reply("ok")
            .with_error(unavailable()),
    );
    app.prompt("Hello").await;

    let (status, body) = app.prompt("Again").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "An error occurred while generating the AI response"
    );
    assert!(body.get("error").is_none());
    assert_eq!(app.session.len().await, 2);
}

#[tokio::test]
async fn provider_invalid_input_is_400() {
    let app = TestApp::new(MockAIProvider::new().with_error(AIError::invalid_request(
        "Invalid value at 'contents[0]'",
    )));

    let (status, body) = app.prompt("Hello").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "The model rejected the request as invalid input"
    );
    assert!(app.session.is_empty().await);
}

#[tokio::test]
async fn error_details_shown_only_when_enabled() {
    let app = TestApp::with_options(
        MockAIProvider::new().with_error(unavailable()),
        HttpOptions::default(),
        true,
    );

    let (status, body) = app.prompt("Hello").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "provider unavailable: upstream overloaded");
}

#[tokio::test]
async fn development_config_exposes_error_details() {
    let provider = MockAIProvider::new().with_error(unavailable());
    let server = ServerConfig {
        environment: Environment::Development,
        ..Default::default()
    };
    let router = build_app_with_provider(Arc::new(provider), &server);

    let (status, body) = send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/v1/generate_response")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"prompt":"Hello"}"#))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("upstream overloaded"));
}

#[tokio::test]
async fn slow_provider_times_out_without_appending() {
    let options = HttpOptions {
        request_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let app = TestApp::with_options(
        MockAIProvider::new()
            .with_reply("too late")
            .with_latency(Duration::from_millis(300)),
        options,
        false,
    );

    let (status, body) = app.prompt("Hello").await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body,
        json!({"success": false, "message": "Request timed out"})
    );
    assert!(app.session.is_empty().await);
}

#[tokio::test]
async fn concurrent_prompts_are_serialized() {
    let app = TestApp::new(MockAIProvider::new().with_latency(Duration::from_millis(10)));

    let requests = (0..5).map(|i| app.prompt_owned(format!("prompt {}", i)));
    let results = join_all(requests).await;

    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));
    let history = app.session.history().await;
    assert_eq!(history.len(), 10);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role.as_str(), "user");
        assert_eq!(pair[1].role.as_str(), "model");
    }
}

// =============================================================================
// POST /api/v1/generate_response/reset
// =============================================================================

#[tokio::test]
async fn reset_discards_prior_exchanges() {
    let app = TestApp::new(MockAIProvider::new());
    app.prompt("one").await;
    app.prompt("two").await;
    assert_eq!(app.session.len().await, 4);

    let (status, body) = app.reset().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Conversation reset"}));

    let (status, body) = app.prompt("Hi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history_len(&body), 2);
    assert_eq!(
        body["data"]["conversation"]["history"][0],
        json!({"role": "user", "content": "Hi"})
    );
}

#[tokio::test]
async fn reset_after_failure_succeeds() {
    let app = TestApp::new(MockAIProvider::new().with_error(unavailable()));
    app.prompt("Hello").await;

    let (status, _) = app.reset().await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.session.is_empty().await);
}

// =============================================================================
// Other routes
// =============================================================================

#[tokio::test]
async fn hello_reports_running() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/v1/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": "Server is running"}));
}

#[tokio::test]
async fn unknown_route_is_404_with_path() {
    let app = TestApp::new(MockAIProvider::new());

    let (status, body) = app
        .send(
            Request::builder()
                .uri("/api/v1/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "message": "Not found: /api/v1/does-not-exist"})
    );
}

#[tokio::test]
async fn wrong_method_on_known_path_is_404_envelope() {
    let app = TestApp::new(MockAIProvider::new());

    let cases = [
        ("GET", "/api/v1/generate_response"),
        ("GET", "/api/v1/generate_response/reset"),
        ("POST", "/api/v1/hello"),
        ("DELETE", "/api/v1/generate_response"),
    ];

    for (method, uri) in cases {
        let (status, body) = app
            .send(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(
            body,
            json!({"success": false, "message": format!("Not found: {}", uri)})
        );
    }

    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = TestApp::new(MockAIProvider::new());
    let huge = json!({ "prompt": "x".repeat(2 * 1024 * 1024) });

    let (status, body) = app.post_json("/api/v1/generate_response", huge).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert!(app.session.is_empty().await);
}
