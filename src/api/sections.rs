//! Website section endpoints

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
use crate::models::{CreateSectionInput, UpdateSectionInput, WebsiteSection};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/nav", get(list_nav_sections))
        .route("/{position_id}", get(get_section))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections).post(create_section))
        .route("/{id}", put(update_section).delete(delete_section))
}

#[derive(Serialize)]
struct SectionsResponse {
    items: Vec<WebsiteSection>,
}

#[derive(Serialize)]
struct SectionResponse {
    item: WebsiteSection,
}

async fn list_nav_sections(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.section_service.nav_sections().await?;
    Ok(Json(SectionsResponse { items }))
}

async fn get_section(
    State(state): State<AppState>,
    ApiPath(position_id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.section_service.get_website_section(&position_id).await? {
        Some(item) => Ok(Json(SectionResponse { item })),
        None => Err(ApiError::not_found(format!("Section not found: {}", position_id))),
    }
}

async fn list_sections(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.section_service.list().await?;
    Ok(Json(SectionsResponse { items }))
}

async fn create_section(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateSectionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.section_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(SectionResponse { item })))
}

async fn update_section(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateSectionInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.section_service.update(id, input).await?;
    Ok(Json(SectionResponse { item }))
}

async fn delete_section(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.section_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
