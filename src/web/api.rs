// src/web/api.rs
// Health, page config and session lifecycle endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::ChatError;
use crate::web::state::AppState;
use crate::web::types::{HealthResponse, PageConfig};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.len().await,
    })
}

pub async fn page_config(State(state): State<AppState>) -> Json<PageConfig> {
    Json(state.page_config())
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    state.sessions.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
