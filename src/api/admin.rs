//! Admin API endpoints
//!
//! Content management routes are nested here by the main router; this
//! module holds the remaining admin operations.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(check_session))
        .route("/cache/social", delete(flush_social_cache))
}

#[derive(Serialize)]
struct SessionResponse {
    permitted: bool,
}

#[derive(Serialize)]
struct FlushResponse {
    removed: usize,
}

/// GET /api/v1/admin/session - Reached only when the permission guard passed
async fn check_session() -> Json<SessionResponse> {
    Json(SessionResponse { permitted: true })
}

/// DELETE /api/v1/admin/cache/social - Drop cached social feeds
async fn flush_social_cache(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .social_service
        .flush()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(FlushResponse { removed }))
}
