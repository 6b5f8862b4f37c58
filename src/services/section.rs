//! Website section service
//!
//! Sections are the named blocks of the site (home page text, about,
//! documentation pages). They are looked up by their position id, a slug.

use crate::db::repositories::SectionRepository;
use crate::models::{CreateSectionInput, UpdateSectionInput, WebsiteSection};
use crate::services::error::{require_non_empty, ContentServiceError};
use crate::services::slug::generate_slug;
use anyhow::Context;
use std::sync::Arc;

pub struct SectionService {
    repo: Arc<dyn SectionRepository>,
}

impl SectionService {
    pub fn new(repo: Arc<dyn SectionRepository>) -> Self {
        Self { repo }
    }

    /// Section at the given position, or `None` when nothing is placed there
    pub async fn get_website_section(
        &self,
        position_id: &str,
    ) -> Result<Option<WebsiteSection>, ContentServiceError> {
        Ok(self.repo.get_by_position_id(position_id).await?)
    }

    pub async fn nav_sections(&self) -> Result<Vec<WebsiteSection>, ContentServiceError> {
        Ok(self.repo.list_nav().await?)
    }

    pub async fn list(&self) -> Result<Vec<WebsiteSection>, ContentServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn create(
        &self,
        input: CreateSectionInput,
    ) -> Result<WebsiteSection, ContentServiceError> {
        require_non_empty("Section title", &input.title)?;

        let position_id = match input.website_position_id.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given.to_string(),
            _ => generate_slug(&input.title),
        };
        require_non_empty("Section position id", &position_id)?;
        self.ensure_position_free(&position_id, None).await?;

        let mut section = WebsiteSection::new(input.title, position_id, input.section_type);
        section.body = input.body;
        section.show_in_nav = input.show_in_nav;
        section.sort_order = input.sort_order;

        let created = self.repo.create(&section).await.context("Failed to create section")?;
        tracing::info!(id = created.id, position_id = %created.website_position_id, "Created section");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdateSectionInput,
    ) -> Result<WebsiteSection, ContentServiceError> {
        let mut section = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("section {}", id)))?;

        if let Some(title) = input.title {
            require_non_empty("Section title", &title)?;
            section.title = title;
        }
        if let Some(position_id) = input.website_position_id {
            require_non_empty("Section position id", &position_id)?;
            section.website_position_id = position_id.trim().to_string();
            self.ensure_position_free(&section.website_position_id, Some(id)).await?;
        }
        if let Some(section_type) = input.section_type {
            section.section_type = section_type;
        }
        if let Some(body) = input.body {
            section.body = body;
        }
        if let Some(show_in_nav) = input.show_in_nav {
            section.show_in_nav = show_in_nav;
        }
        if let Some(sort_order) = input.sort_order {
            section.sort_order = sort_order;
        }

        Ok(self.repo.update(&section).await.context("Failed to update section")?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ContentServiceError::NotFound(format!("section {}", id)));
        }
        self.repo.delete(id).await?;
        tracing::info!(id, "Deleted section");
        Ok(())
    }

    async fn ensure_position_free(
        &self,
        position_id: &str,
        current_id: Option<i64>,
    ) -> Result<(), ContentServiceError> {
        match self.repo.get_by_position_id(position_id).await? {
            Some(existing) if Some(existing.id) != current_id => Err(
                ContentServiceError::Conflict(format!("section position '{}'", position_id)),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSectionRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::SectionType;

    async fn setup_service() -> SectionService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        SectionService::new(SqlxSectionRepository::boxed(pool))
    }

    fn input(title: &str, show_in_nav: bool) -> CreateSectionInput {
        CreateSectionInput {
            title: title.to_string(),
            website_position_id: None,
            section_type: SectionType::Page,
            body: String::new(),
            show_in_nav,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_missing_section_is_none() {
        let service = setup_service().await;
        assert!(service.get_website_section("home_section_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_and_fetch_by_position() {
        let service = setup_service().await;
        let created = service.create(input("Getting Started", true)).await.unwrap();

        assert_eq!(created.website_position_id, "getting-started");
        let found = service.get_website_section("getting-started").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_nav_sections_only_flagged() {
        let service = setup_service().await;
        service.create(input("Documentation", true)).await.unwrap();
        service.create(input("Footer", false)).await.unwrap();

        let nav = service.nav_sections().await.unwrap();
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].title, "Documentation");
    }

    #[tokio::test]
    async fn test_duplicate_position_is_conflict() {
        let service = setup_service().await;
        service.create(input("About", false)).await.unwrap();

        let mut clash = input("About us", false);
        clash.website_position_id = Some("about".into());
        assert!(matches!(
            service.create(clash).await,
            Err(ContentServiceError::Conflict(_))
        ));
    }
}
