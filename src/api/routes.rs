//! API route configuration.

use crate::api::handlers::{create_link_handler, redirect_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short link routes.
///
/// # Endpoints
///
/// - `POST /url`          - Create (or fetch) the short link for a URL
/// - `GET  /url/{token}`  - Redirect to the original URL
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(create_link_handler))
        .route("/url/{token}", get(redirect_handler))
}
