//! Public site metadata API

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::api::extract::ApiQuery;
use crate::api::middleware::AppState;
use crate::models::{MetaInput, MetaTags};
use crate::services::build_meta_tags;

pub fn router() -> Router<AppState> {
    Router::new().route("/meta", get(get_meta_tags))
}

/// GET /api/v1/site/meta - Meta tags for a page
///
/// Every query parameter is optional; missing ones fall back to the site
/// defaults. `keywords` is a comma separated list.
async fn get_meta_tags(
    State(state): State<AppState>,
    ApiQuery(input): ApiQuery<MetaInput>,
) -> Json<MetaTags> {
    Json(build_meta_tags(&state.site, input))
}
