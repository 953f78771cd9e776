//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Storage is unreachable or the cache is not
///   receiving deletions
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Backend: postgres" },
///     "deletion_feed": { "status": "ok", "message": "Cached tokens: 42" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage = check_storage(&state).await;
    let deletion_feed = check_deletion_feed(&state).await;

    let all_healthy = storage.is_ok() && deletion_feed.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            storage,
            deletion_feed,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_storage(state: &AppState) -> CheckStatus {
    match state.link_service.check_storage().await {
        Ok(()) => CheckStatus::ok(format!("Backend: {}", state.storage_backend)),
        Err(e) => CheckStatus::error(format!(
            "Backend {} unavailable: {}",
            state.storage_backend, e
        )),
    }
}

async fn check_deletion_feed(state: &AppState) -> CheckStatus {
    if state.token_cache.is_feed_active() {
        CheckStatus::ok(format!("Cached tokens: {}", state.token_cache.len().await))
    } else {
        CheckStatus::error("Token cache is not receiving expired tokens")
    }
}
