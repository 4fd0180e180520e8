// src/web/chat.rs
// POST /api/chat: forward one message into the caller's conversation

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::error::ChatError;
use crate::web::state::AppState;
use crate::web::types::{ChatRequest, ChatResponse, SESSION_HEADER};

/// The body is taken raw so malformed JSON fails like any other error
/// (500 with `{error}`) rather than through axum's extractor rejection.
pub async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return failure(ChatError::from(e), None),
    };

    // Header wins over the body field
    let requested_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .or_else(|| request.session_id.clone());

    let session = match state
        .sessions
        .get_or_create(requested_id.as_deref(), || {
            state.provider.start_chat(state.generation.clone())
        })
        .await
    {
        Ok(session) => session,
        Err(e) => return failure(e, None),
    };

    let message = match request.message_text() {
        Ok(message) => message,
        Err(e) => return failure(e, Some(session.id())),
    };

    // Touched before the lock is released so the sweeper never sees the
    // exchange as idle time
    let result = {
        let mut conversation = session.lock().await;
        let result = state.provider.send_message(&mut conversation, &message).await;
        session.touch();
        result
    };

    match result {
        Ok(response) => {
            info!(session_id = %session.id(), reply_len = response.len(), "Chat exchange completed");
            let body = ChatResponse {
                response,
                session_id: Some(session.id().to_string()),
            };
            with_session_header(Json(body).into_response(), session.id())
        }
        Err(e) => failure(e, Some(session.id())),
    }
}

fn failure(err: ChatError, session_id: Option<&str>) -> Response {
    error!(error = %err, session_id = ?session_id, "Error in chat API");
    let response = err.into_response();
    match session_id {
        Some(id) => with_session_header(response, id),
        None => response,
    }
}

fn with_session_header(mut response: Response, session_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    response
}
