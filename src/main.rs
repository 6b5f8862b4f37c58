//! labsite - Backend for a research lab website

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labsite::{
    api::{self, AppState},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxBlogPostRepository, SqlxEventPostRepository, SqlxPublicationRepository,
            SqlxSectionRepository,
        },
    },
    services::{
        BlogPostService, EventPostService, FeedService, PublicationService, SectionService,
        SocialClient, SocialFeedService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "labsite=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting labsite...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    let applied = db::migrations::run_migrations(&pool).await?;
    tracing::info!(applied, "Database migrations completed");

    let cache = create_cache(&config.cache);
    tracing::info!(ttl_seconds = config.cache.ttl_seconds, "Cache initialized");

    // Create repositories
    let blog_repo = SqlxBlogPostRepository::boxed(pool.clone());
    let event_repo = SqlxEventPostRepository::boxed(pool.clone());
    let publication_repo = SqlxPublicationRepository::boxed(pool.clone());
    let section_repo = SqlxSectionRepository::boxed(pool.clone());

    // Initialize services
    let social_client = SocialClient::new(config.social.clone())
        .context("Failed to build HTTP client for social feeds")?;

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
        social_service: Arc::new(SocialFeedService::new(Arc::new(social_client), cache)),
        site: Arc::new(config.site.clone()),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
