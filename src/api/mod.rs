//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api/v1`:
//! - Feed endpoints (news, highlights, latest posts)
//! - Website sections, blog posts, events and publications
//! - Social media feeds
//! - Site meta tags
//! - Admin content management, guarded by a GitHub permission check

pub mod admin;
pub mod blog;
pub mod events;
pub mod extract;
pub mod middleware;
pub mod news;
pub mod publications;
pub mod sections;
pub mod site;
pub mod social;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (need commit permission on the site repository)
    let admin_routes = Router::new()
        .nest("/admin", admin::router())
        .nest("/admin/blog", blog::admin_router())
        .nest("/admin/events", events::admin_router())
        .nest("/admin/publications", publications::admin_router())
        .nest("/admin/sections", sections::admin_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_commit_permission,
        ));

    // Public routes
    Router::new()
        .merge(news::router())
        .merge(blog::public_router())
        .merge(events::public_router())
        .merge(publications::public_router())
        .nest("/sections", sections::public_router())
        .nest("/social", social::router())
        .nest("/site", site::router())
        .merge(admin_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(middleware::GITHUB_TOKEN_HEADER),
        ]);

    if origin == "*" {
        return cors.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors.allow_origin(value),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, cross-origin requests disabled");
            cors
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::{SiteConfig, SocialConfig};
    use crate::db::repositories::{
        SqlxBlogPostRepository, SqlxEventPostRepository, SqlxPublicationRepository,
        SqlxSectionRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::services::{
        BlogPostService, EventPostService, FeedService, PublicationService, SectionService,
        SocialClient, SocialFeedService,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app(github_api: String) -> Router {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");

        let blog_repo = SqlxBlogPostRepository::boxed(pool.clone());
        let event_repo = SqlxEventPostRepository::boxed(pool.clone());
        let publication_repo = SqlxPublicationRepository::boxed(pool.clone());
        let section_repo = SqlxSectionRepository::boxed(pool);

        let social_client = SocialClient::new(SocialConfig {
            github_api,
            ..SocialConfig::default()
        })
        .unwrap();

        let state = AppState {
            feed_service: Arc::new(FeedService::new(
                blog_repo.clone(),
                event_repo.clone(),
                publication_repo.clone(),
            )),
            blog_service: Arc::new(BlogPostService::new(blog_repo)),
            event_service: Arc::new(EventPostService::new(event_repo)),
            publication_service: Arc::new(PublicationService::new(publication_repo)),
            section_service: Arc::new(SectionService::new(section_repo)),
            social_service: Arc::new(SocialFeedService::new(
                Arc::new(social_client),
                Arc::new(MemoryCache::new()),
            )),
            site: Arc::new(SiteConfig::default()),
        };
        build_router(state, "*")
    }

    async fn grant_github_access(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/orgs/nipy/repos")
            .match_query(mockito::Matcher::Any)
            .match_header("authorization", "token maintainer")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([{"name": "dipy.org", "permissions": {"pull": true}}]).to_string())
            .create_async()
            .await
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn admin_post(uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_news_feed() {
        let app = test_app("http://127.0.0.1:1".into()).await;
        let response = app.oneshot(get("/api/v1/news?limit=3")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"items": []}));
    }

    #[tokio::test]
    async fn test_missing_section_is_404() {
        let app = test_app("http://127.0.0.1:1".into()).await;
        let response = app.oneshot(get("/api/v1/sections/home_section_1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_admin_without_token_is_forbidden() {
        let mut server = mockito::Server::new_async().await;
        let github = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let app = test_app(server.url()).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/admin/blog")
            .header("content-type", "application/json")
            .body(Body::from(json!({"title": "x", "body": "y", "author": "z"}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"]["code"], "FORBIDDEN");
        github.assert_async().await;
    }

    #[tokio::test]
    async fn test_admin_creates_post_visible_in_feeds() {
        let mut server = mockito::Server::new_async().await;
        let _github = grant_github_access(&mut server).await;
        let app = test_app(server.url()).await;

        let created = app
            .clone()
            .oneshot(admin_post(
                "/api/v1/admin/blog",
                "maintainer",
                json!({"title": "DIPY 1.9", "body": "Notes", "author": "team", "is_highlighted": true}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(json_body(created).await["item"]["identifier"], "dipy-1-9");

        let post = app.clone().oneshot(get("/api/v1/blog/dipy-1-9")).await.unwrap();
        assert_eq!(post.status(), StatusCode::OK);

        let highlights = json_body(app.clone().oneshot(get("/api/v1/highlights")).await.unwrap()).await;
        assert_eq!(highlights["items"][0]["kind"], "blog_post");

        let duplicate = app
            .oneshot(admin_post(
                "/api/v1/admin/blog",
                "maintainer",
                json!({"title": "DIPY 1.9", "body": "Again", "author": "team"}),
            ))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_social_source_and_count_validation() {
        let app = test_app("http://127.0.0.1:1".into()).await;

        let unknown = app.clone().oneshot(get("/api/v1/social/myspace?account=lab")).await.unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let zero = app.oneshot(get("/api/v1/social/facebook?account=lab&count=0")).await.unwrap();
        assert_eq!(zero.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_site_meta_defaults() {
        let app = test_app("http://127.0.0.1:1".into()).await;
        let response = app.oneshot(get("/api/v1/site/meta?title=Team")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Team");
        assert_eq!(body["url"], "/");
        assert_eq!(body["object_type"], "website");
    }

    #[tokio::test]
    async fn test_malformed_query_is_validation_error() {
        let app = test_app("http://127.0.0.1:1".into()).await;
        let response = app.oneshot(get("/api/v1/news?limit=-1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_admin_input_is_validation_error() {
        let mut server = mockito::Server::new_async().await;
        let _github = grant_github_access(&mut server).await;
        let app = test_app(server.url()).await;

        let missing_fields = app
            .clone()
            .oneshot(admin_post("/api/v1/admin/blog", "maintainer", json!({"title": 7})))
            .await
            .unwrap();
        assert_eq!(missing_fields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(missing_fields).await["error"]["code"], "VALIDATION_ERROR");

        let bad_id = Request::builder()
            .method("DELETE")
            .uri("/api/v1/admin/events/not-a-number")
            .header("authorization", "Bearer maintainer")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(bad_id).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_admin_null_end_date_puts_event_back_in_news() {
        let mut server = mockito::Server::new_async().await;
        let _github = grant_github_access(&mut server).await;
        let app = test_app(server.url()).await;

        let now = chrono::Utc::now();
        let created = app
            .clone()
            .oneshot(admin_post(
                "/api/v1/admin/events",
                "maintainer",
                json!({
                    "title": "Summer school",
                    "start_date": now - chrono::Duration::days(5),
                    "end_date": now - chrono::Duration::days(2),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = json_body(created).await["item"]["id"].as_i64().unwrap();

        let news = json_body(app.clone().oneshot(get("/api/v1/news")).await.unwrap()).await;
        assert_eq!(news, json!({"items": []}));

        let update = Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/admin/events/{}", id))
            .header("content-type", "application/json")
            .header("authorization", "Bearer maintainer")
            .body(Body::from(json!({"end_date": null}).to_string()))
            .unwrap();
        let updated = app.clone().oneshot(update).await.unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(json_body(updated).await["item"]["end_date"], Value::Null);

        let news = json_body(app.oneshot(get("/api/v1/news")).await.unwrap()).await;
        assert_eq!(news["items"][0]["identifier"], "summer-school");
    }
}
