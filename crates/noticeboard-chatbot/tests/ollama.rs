//! Integration tests for the Ollama-backed chatbot using wiremock HTTP mocks.

use noticeboard_chatbot::{
    analyze_sentiment, summarize, ChatCompletion, ChatMessage, Chatbot, ChatbotError,
    ContextSource, OllamaClient, OllamaConfig, Sentiment,
};
use noticeboard_core::{Announcement, PortalSnapshot};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OllamaClient {
    OllamaClient::with_base_url(base_url, OllamaConfig::default())
        .expect("client construction should not fail")
}

fn snapshot() -> PortalSnapshot {
    PortalSnapshot {
        users: vec![],
        announcements: vec![Announcement {
            id: 7,
            title: "Pool reopening".to_string(),
            description: "The pool reopens on Monday.".to_string(),
            user_id: None,
            image_url: None,
            created_at: None,
            updated_at: None,
        }],
    }
}

async fn mount_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3.1:latest",
            "response": reply,
            "done": true
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn generate_posts_non_streaming_request_and_trims_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.1:latest",
            "prompt": "hello",
            "stream": false,
            "options": { "num_predict": 2000 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "  hi there \n" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = test_client(&server.uri())
        .generate("hello")
        .await
        .expect("should parse reply");
    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn generate_maps_server_error_to_upstream_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).generate("hello").await.unwrap_err();
    assert!(
        matches!(err, ChatbotError::UpstreamUnavailable(ref m) if m.contains("500")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn generate_rejects_body_without_response_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "model not found" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).generate("hello").await.unwrap_err();
    assert!(matches!(err, ChatbotError::UpstreamUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn generate_reports_unreachable_server() {
    // Port 9 (discard) is not expected to run an HTTP server.
    let err = test_client("http://127.0.0.1:9").generate("hello").await.unwrap_err();
    assert!(matches!(err, ChatbotError::UpstreamUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn chatbot_prompt_carries_snapshot_history_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Pool reopening"))
        .and(body_string_contains("<|assistant|>\\nEarlier answer\\n</s>"))
        .and(body_string_contains("<|user|>\\nWhen does the pool open?\\n</s>"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "On Monday." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let chatbot = Chatbot::new(test_client(&server.uri()), ContextSource::Static(snapshot()));
    let history = [
        ChatMessage::user("Earlier question"),
        ChatMessage::assistant("Earlier answer"),
    ];
    let reply = chatbot
        .complete("When does the pool open?", &history)
        .await
        .expect("reply");
    assert_eq!(reply, "On Monday.");
}

#[tokio::test]
async fn chatbot_rejects_empty_query_without_calling_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let chatbot = Chatbot::new(test_client(&server.uri()), ContextSource::default());
    let err = chatbot.complete("  ", &[]).await.unwrap_err();
    assert!(err.is_client_error(), "got {err:?}");
}

#[tokio::test]
async fn chatbot_surfaces_missing_snapshot_file() {
    let server = MockServer::start().await;
    let chatbot = Chatbot::new(
        test_client(&server.uri()),
        ContextSource::File("/nonexistent/portal.yaml".into()),
    );
    let err = chatbot.complete("hello", &[]).await.unwrap_err();
    assert!(matches!(err, ChatbotError::Context(_)), "got {err:?}");
}

fn write_snapshot(path: &std::path::Path, title: &str) {
    let yaml = format!(
        "announcements:\n  - id: 1\n    title: {title}\n    description: Front office notice.\n"
    );
    std::fs::write(path, yaml).expect("write snapshot");
}

#[tokio::test]
async fn chatbot_rereads_snapshot_file_on_every_query() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot_path = dir.path().join("portal.yaml");
    write_snapshot(&snapshot_path, "Pool reopening");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Pool reopening"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "pool" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Library hours extended"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "response": "library" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let chatbot = Chatbot::new(
        test_client(&server.uri()),
        ContextSource::File(snapshot_path.clone()),
    );

    let first = chatbot.complete("What is new?", &[]).await.expect("first reply");
    assert_eq!(first, "pool");

    write_snapshot(&snapshot_path, "Library hours extended");
    let second = chatbot.complete("What is new?", &[]).await.expect("second reply");
    assert_eq!(second, "library");
}

#[tokio::test]
async fn sentiment_end_to_end_through_ollama() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        "Sentiment: positive\nScore: 55\nReason: Generally upbeat tone.",
    )
    .await;

    let chatbot = Chatbot::new(test_client(&server.uri()), ContextSource::Static(snapshot()));
    let result = analyze_sentiment(&chatbot, "Pool reopening\n\nThe pool reopens on Monday.")
        .await
        .expect("sentiment");

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert!((result.score - 0.8).abs() < 1e-9);
    assert_eq!(result.analysis, "Generally upbeat tone");
}

#[tokio::test]
async fn sentiment_reports_extraction_failure_when_model_is_down() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let chatbot = Chatbot::new(test_client(&server.uri()), ContextSource::default());
    let err = analyze_sentiment(&chatbot, "anything").await.unwrap_err();
    assert!(matches!(err, ChatbotError::ExtractionFailed(_)), "got {err:?}");
}

#[tokio::test]
async fn summarize_returns_model_reply() {
    let server = MockServer::start().await;
    mount_reply(&server, "The pool reopens Monday.").await;

    let chatbot = Chatbot::new(test_client(&server.uri()), ContextSource::default());
    let summary = summarize(&chatbot, "The municipal pool, closed since June, reopens Monday.")
        .await
        .expect("summary");
    assert_eq!(summary, "The pool reopens Monday.");
}
