use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

#[axum::debug_handler]
async fn health() -> impl IntoResponse {
    let body = json!({
        "status": "ok",
    });
    (StatusCode::OK, Json(body))
}

/// Serves the built client bundle. Any unmatched path falls back to the
/// entry page so route handling stays on the client.
pub fn router(static_dir: &Path) -> Router {
    let index = ServeFile::new(static_dir.join("index.html"));
    let bundle = ServeDir::new(static_dir).fallback(index);

    Router::new()
        .route("/health", get(health))
        .fallback_service(bundle)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
