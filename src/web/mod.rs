// src/web/mod.rs
// Web server layer: chat endpoint, session API and the embedded page

pub mod api;
pub mod chat;
pub mod embedded;
pub mod state;
pub mod types;

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header},
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::web::state::AppState;
use crate::web::types::SESSION_HEADER;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(SESSION_HEADER),
        ])
        .expose_headers([header::HeaderName::from_static(SESSION_HEADER)]);

    let api_router = Router::new()
        .route("/chat", post(chat::chat))
        .route("/config", get(api::page_config))
        .route("/session/{id}", delete(api::end_session));

    Router::new()
        .route("/", get(embedded::index_html))
        .route("/health", get(api::health))
        .nest("/api", api_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("gemchat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
