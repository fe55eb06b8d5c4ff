// handlers/root.rs - GET /, GET /health and the 404/405 fallbacks

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;

use crate::middleware::{ApiResponse, Envelope};
use crate::state::AppState;

/// GET / - plain-text liveness message
pub async fn root() -> &'static str {
    "campus server is running"
}

/// GET /health - reports whether the document store answers
pub async fn health(State(state): State<AppState>) -> Response {
    let now = Utc::now();

    match state.store.health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Envelope::new(
                false,
                Some(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
                Some("database unavailable".to_string()),
            )
            .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> Response {
    Envelope::failure("route not found").into_response_with(StatusCode::NOT_FOUND)
}

/// Fallback for a known path hit with an unsupported method
pub async fn method_not_allowed() -> Response {
    Envelope::failure("method not allowed").into_response_with(StatusCode::METHOD_NOT_ALLOWED)
}
