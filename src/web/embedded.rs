// src/web/embedded.rs
// Chat page compiled into the binary

use axum::{
    http::{HeaderValue, header},
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Handler for serving index.html
pub async fn index_html() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))],
        Html(INDEX_HTML),
    )
}
