//! Social feed endpoints
//!
//! `GET /social/{source}?account=...&count=...` where source is one of
//! `google-plus`, `facebook`, `twitter` or `youtube`. Upstream failures
//! produce an empty list, never an error.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::{ApiPath, ApiQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::services::SocialSource;

const DEFAULT_COUNT: u32 = 5;
const MAX_COUNT: u32 = 50;

pub fn router() -> Router<AppState> {
    Router::new().route("/{source}", get(get_social_feed))
}

#[derive(Debug, Deserialize)]
pub struct SocialFeedQuery {
    /// User id, page id, screen name or channel id depending on the source
    pub account: String,
    pub count: Option<u32>,
}

#[derive(Serialize)]
struct SocialFeedResponse {
    source: &'static str,
    items: Vec<serde_json::Value>,
}

async fn get_social_feed(
    State(state): State<AppState>,
    ApiPath(source): ApiPath<String>,
    ApiQuery(query): ApiQuery<SocialFeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let source = SocialSource::parse(&source)
        .ok_or_else(|| ApiError::not_found(format!("Unknown social source: {}", source)))?;

    let account = query.account.trim();
    if account.is_empty() {
        return Err(ApiError::validation_error("account cannot be empty"));
    }
    let count = query.count.unwrap_or(DEFAULT_COUNT);
    if count == 0 || count > MAX_COUNT {
        return Err(ApiError::validation_error(format!(
            "count must be between 1 and {}",
            MAX_COUNT
        )));
    }

    let items = state.social_service.feed(source, account, count).await;
    Ok(Json(SocialFeedResponse {
        source: source.as_str(),
        items,
    }))
}
