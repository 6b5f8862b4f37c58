//! Feed endpoints: news, highlights and latest posts

use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::extract::ApiQuery;
use crate::api::middleware::{ApiError, AppState};
use crate::models::{BlogPost, ContentItem, EventPost};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(news_feed))
        .route("/highlights", get(highlights_feed))
        .route("/blog/latest", get(latest_blog_posts))
        .route("/events/latest", get(latest_events))
}

/// `?limit=` query; absent means no limit
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct FeedResponse {
    items: Vec<ContentItem>,
}

#[derive(Serialize)]
struct BlogPostsResponse {
    items: Vec<BlogPost>,
}

#[derive(Serialize)]
struct EventPostsResponse {
    items: Vec<EventPost>,
}

async fn news_feed(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .feed_service
        .news_posts(query.limit)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(FeedResponse { items }))
}

async fn highlights_feed(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .feed_service
        .highlights(query.limit)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(FeedResponse { items }))
}

async fn latest_blog_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .feed_service
        .latest_blog_posts(query.limit)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(BlogPostsResponse { items }))
}

async fn latest_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .feed_service
        .latest_event_posts(query.limit)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;
    Ok(Json(EventPostsResponse { items }))
}
