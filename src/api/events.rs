//! Event endpoints

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
use crate::models::{CreateEventPostInput, EventPost, UpdateEventPostInput};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/events/{identifier}", get(get_event))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", put(update_event).delete(delete_event))
}

#[derive(Serialize)]
struct EventsResponse {
    items: Vec<EventPost>,
}

#[derive(Serialize)]
struct EventResponse {
    item: EventPost,
}

async fn get_event(
    State(state): State<AppState>,
    ApiPath(identifier): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.event_service.get_by_identifier(&identifier).await? {
        Some(item) => Ok(Json(EventResponse { item })),
        None => Err(ApiError::not_found(format!("Event not found: {}", identifier))),
    }
}

async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let items = state.event_service.list().await?;
    Ok(Json(EventsResponse { items }))
}

async fn create_event(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateEventPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.event_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(EventResponse { item })))
}

async fn update_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateEventPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.event_service.update(id, input).await?;
    Ok(Json(EventResponse { item }))
}

async fn delete_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.event_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
