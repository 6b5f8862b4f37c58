//! API middleware
//!
//! Contains the shared application state, the JSON error type and the
//! GitHub permission guard for admin routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::services::{
    BlogPostService, ContentServiceError, EventPostService, FeedService, PublicationService,
    SectionService, SocialFeedService,
};

/// Header carrying a GitHub token when `Authorization` is not used
pub const GITHUB_TOKEN_HEADER: &str = "x-github-token";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub feed_service: Arc<FeedService>,
    pub blog_service: Arc<BlogPostService>,
    pub event_service: Arc<EventPostService>,
    pub publication_service: Arc<PublicationService>,
    pub section_service: Arc<SectionService>,
    pub social_service: Arc<SocialFeedService>,
    pub site: Arc<SiteConfig>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ContentServiceError> for ApiError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound(what) => ApiError::not_found(format!("Not found: {}", what)),
            ContentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ContentServiceError::Conflict(what) => {
                ApiError::conflict(format!("Already exists: {}", what))
            }
            ContentServiceError::InternalError(e) => {
                tracing::error!(error = %e, "Content service failure");
                ApiError::internal_error(e.to_string())
            }
        }
    }
}

/// Extract the caller's GitHub token
///
/// `Authorization: Bearer <token>` (or `token <token>`) wins over the
/// `X-GitHub-Token` header.
pub fn extract_github_token(headers: &HeaderMap) -> Option<String> {
    let from_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth| {
            auth.strip_prefix("Bearer ")
                .or_else(|| auth.strip_prefix("token "))
        });

    from_authorization
        .or_else(|| {
            headers
                .get(GITHUB_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Admin guard: the caller must have access to the configured GitHub repository
pub async fn require_commit_permission(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_github_token(request.headers()).unwrap_or_default();

    if !state.social_service.has_commit_permission(&token).await {
        tracing::info!(path = %request.uri().path(), "Admin request denied");
        return Err(ApiError::forbidden("Commit permission on the site repository required"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_prefers_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(GITHUB_TOKEN_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(extract_github_token(&headers), Some("abc".to_string()));
    }

    #[test]
    fn test_extract_token_falls_back_to_github_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(GITHUB_TOKEN_HEADER, HeaderValue::from_static(" xyz "));
        assert_eq!(extract_github_token(&headers), Some("xyz".to_string()));
    }

    #[test]
    fn test_extract_token_missing_or_blank() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_github_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_github_token(&headers), None);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (ApiError::forbidden("x"), StatusCode::FORBIDDEN),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND),
            (ApiError::validation_error("x"), StatusCode::BAD_REQUEST),
            (ApiError::conflict("x"), StatusCode::CONFLICT),
            (ApiError::internal_error("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
