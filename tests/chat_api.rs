// tests/chat_api.rs
// Router-level tests for the chat endpoint and session API


use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gemchat::session::SessionStore;
use gemchat::web::create_router;
use gemchat::web::state::AppState;
use gemchat::web::types::SESSION_HEADER;
use serde_json::json;
use test_helpers::{MockProvider, chat_request, create_test_app, create_test_state, json_body};
use tower::ServiceExt;

#[tokio::test]
async fn test_chat_returns_reply_and_session_id() {
    let app = create_test_app(MockProvider::new());

    let response = app
        .oneshot(chat_request(json!({"message": "Hello"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header_id = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("session header");

    let body = json_body(response).await;
    assert_eq!(body["response"], "echo: Hello (0 prior turns)");
    assert_eq!(body["session_id"], header_id);
}

#[tokio::test]
async fn test_same_session_keeps_context() {
    let app = create_test_app(MockProvider::new());

    let first = json_body(
        app.clone()
            .oneshot(chat_request(json!({"message": "Hi"}).to_string()))
            .await
            .unwrap(),
    )
    .await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let second = app
        .oneshot(chat_request(
            json!({"message": "Again", "session_id": session_id}).to_string(),
        ))
        .await
        .unwrap();
    let body = json_body(second).await;

    assert_eq!(body["response"], "echo: Again (2 prior turns)");
    assert_eq!(body["session_id"], session_id);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = create_test_app(MockProvider::new());

    let first = json_body(
        app.clone()
            .oneshot(chat_request(json!({"message": "Hi"}).to_string()))
            .await
            .unwrap(),
    )
    .await;

    // No id: a second caller must not see the first caller's history
    let second = json_body(
        app.oneshot(chat_request(json!({"message": "Hi"}).to_string()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(second["response"], "echo: Hi (0 prior turns)");
    assert_ne!(first["session_id"], second["session_id"]);
}

#[tokio::test]
async fn test_header_session_id_wins_over_body() {
    let (state, sessions) = create_test_state(MockProvider::new());
    let app = create_router(state);

    let first = json_body(
        app.clone()
            .oneshot(chat_request(json!({"message": "Hi"}).to_string()))
            .await
            .unwrap(),
    )
    .await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .header(SESSION_HEADER, &session_id)
        .body(Body::from(
            json!({"message": "Again", "session_id": "somebody-else"}).to_string(),
        ))
        .unwrap();
    let body = json_body(app.oneshot(request).await.unwrap()).await;

    assert_eq!(body["session_id"], session_id);
    assert_eq!(body["response"], "echo: Again (2 prior turns)");
    assert_eq!(sessions.len().await, 1);
}

#[tokio::test]
async fn test_unknown_session_id_gets_fresh_session() {
    let app = create_test_app(MockProvider::new());

    let response = app
        .oneshot(chat_request(
            json!({"message": "Hi", "session_id": "not-a-real-session"}).to_string(),
        ))
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["response"], "echo: Hi (0 prior turns)");
    assert_ne!(body["session_id"], "not-a-real-session");
}

#[tokio::test]
async fn test_malformed_json_is_500_with_error() {
    let app = create_test_app(MockProvider::new());

    let response = app.oneshot(chat_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(body.get("response").is_none());
}

#[tokio::test]
async fn test_missing_message_is_500_with_error() {
    let app = create_test_app(MockProvider::new());

    let response = app.oneshot(chat_request(json!({}).to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("message is required"));
}

#[tokio::test]
async fn test_non_string_message_is_500_with_error() {
    let app = create_test_app(MockProvider::new());

    let response = app
        .oneshot(chat_request(json!({"message": 42}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("must be a string"));
}

#[tokio::test]
async fn test_empty_message_is_forwarded() {
    let app = create_test_app(MockProvider::new());

    let response = app
        .oneshot(chat_request(json!({"message": ""}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["response"], "echo:  (0 prior turns)");
}

#[tokio::test]
async fn test_provider_error_is_passed_through() {
    let (state, _) = create_test_state(MockProvider::failing_on("boom"));
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(chat_request(json!({"message": "boom"}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let session_id = response
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("session header on provider failure");
    let body = json_body(response).await;
    assert_eq!(body, json!({"error": "upstream exploded"}));

    // A failed exchange leaves the conversation as it was
    let retry = json_body(
        app.oneshot(chat_request(
            json!({"message": "fine", "session_id": session_id}).to_string(),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(retry["response"], "echo: fine (0 prior turns)");
}

#[tokio::test]
async fn test_end_session() {
    let (state, sessions) = create_test_state(MockProvider::new());
    let app = create_router(state);

    let first = json_body(
        app.clone()
            .oneshot(chat_request(json!({"message": "Hi"}).to_string()))
            .await
            .unwrap(),
    )
    .await;
    let session_id = first["session_id"].as_str().unwrap().to_string();
    assert_eq!(sessions.len().await, 1);

    let delete = |id: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/session/{}", id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(session_id.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(sessions.is_empty().await);

    let response = app.oneshot(delete(session_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("session not found"));
}

#[tokio::test]
async fn test_health_reports_session_count() {
    let app = create_test_app(MockProvider::new());

    app.clone()
        .oneshot(chat_request(json!({"message": "Hi"}).to_string()))
        .await
        .unwrap();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn test_page_config_defaults_to_all_controls_off() {
    let state = AppState::new(Arc::new(MockProvider::new()), Arc::new(SessionStore::default()))
        .with_model_display_name("Gemini 2.0 Flash Lite");
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/api/config").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["model"], "mock-model");
    assert_eq!(body["model_display_name"], "Gemini 2.0 Flash Lite");
    for flag in ["like", "dislike", "regenerate", "share", "model_select"] {
        assert_eq!(body["affordances"][flag], false, "{} should be off", flag);
    }
}

#[tokio::test]
async fn test_index_serves_chat_page() {
    let app = create_test_app(MockProvider::new());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/api/chat"));
    assert!(html.contains(SESSION_HEADER));
}
