//! Handlers for creating and resolving short links.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link, or returns the existing one for the same URL.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "link": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_link": "http://localhost:8080/url/aZ3kQ9xB1c",
///   "expires_at": "2025-01-02T15:04:05Z"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the link is empty or not an absolute URI
/// - 409 if no free token was found within the retry budget
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.create_short_link(&payload.link).await?;

    Ok(Json(link.into()))
}

/// Redirects a token to its original URL with `302 Found`.
///
/// # Endpoint
///
/// `GET /url/{token}`
///
/// # Errors
///
/// Returns 404 Not Found if the token is unknown or has been swept.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.get_original_link(&token).await?;
    debug!(%token, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, original_url)]))
}
