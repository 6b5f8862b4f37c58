//! Publication endpoints

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
use crate::models::{CreatePublicationInput, Publication, UpdatePublicationInput};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/publications", get(list_publications))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_publications).post(create_publication))
        .route("/{id}", put(update_publication).delete(delete_publication))
}

#[derive(Serialize)]
struct PublicationsResponse {
    items: Vec<Publication>,
}

#[derive(Serialize)]
struct PublicationResponse {
    item: Publication,
}

async fn list_publications(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.publication_service.list().await?;
    Ok(Json(PublicationsResponse { items }))
}

async fn create_publication(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePublicationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.publication_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(PublicationResponse { item })))
}

async fn update_publication(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdatePublicationInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.publication_service.update(id, input).await?;
    Ok(Json(PublicationResponse { item }))
}

async fn delete_publication(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.publication_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
