//! HTTP router for the FileGate gateway

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use filegate_storage::{handlers, GatewayState};

/// Create the main application router
pub fn create_router(state: GatewayState, max_form_bytes: usize) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(handlers::routes(max_form_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

async fn health_check(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let body = json!({
        "status": "running",
        "bucket": state.uploads.store().bucket(),
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
}
