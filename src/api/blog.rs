//! Blog post endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{BlogPost, CreateBlogPostInput, UpdateBlogPostInput};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/blog/{identifier}", get(get_blog_post))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blog_posts).post(create_blog_post))
        .route("/{id}", put(update_blog_post).delete(delete_blog_post))
}

#[derive(Serialize)]
struct BlogPostsResponse {
    items: Vec<BlogPost>,
}

#[derive(Serialize)]
struct BlogPostResponse {
    item: BlogPost,
}

async fn get_blog_post(
    State(state): State<AppState>,
    ApiPath(identifier): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.blog_service.get_by_identifier(&identifier).await? {
        Some(item) => Ok(Json(BlogPostResponse { item })),
        None => Err(ApiError::not_found(format!("Blog post not found: {}", identifier))),
    }
}

async fn list_blog_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.blog_service.list().await?;
    Ok(Json(BlogPostsResponse { items }))
}

async fn create_blog_post(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateBlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.blog_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(BlogPostResponse { item })))
}

async fn update_blog_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateBlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.blog_service.update(id, input).await?;
    Ok(Json(BlogPostResponse { item }))
}

async fn delete_blog_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.blog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
