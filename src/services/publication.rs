//! Publication service

use crate::db::repositories::PublicationRepository;
use crate::models::{CreatePublicationInput, Publication, UpdatePublicationInput};
use crate::services::error::{require_non_empty, ContentServiceError};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

pub struct PublicationService {
    repo: Arc<dyn PublicationRepository>,
}

impl PublicationService {
    pub fn new(repo: Arc<dyn PublicationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        input: CreatePublicationInput,
    ) -> Result<Publication, ContentServiceError> {
        require_non_empty("Publication title", &input.title)?;
        require_non_empty("Publication authors", &input.authors)?;
        validate_year(input.year)?;

        let mut publication = Publication::new(input.title, input.authors, input.year);
        publication.venue = input.venue;
        publication.url = input.url;
        publication.entry_type = input.entry_type;
        publication.is_highlighted = input.is_highlighted;

        let created = self
            .repo
            .create(&publication)
            .await
            .context("Failed to create publication")?;
        tracing::info!(id = created.id, "Created publication");
        Ok(created)
    }

    /// All publications, most recent year first
    pub async fn list(&self) -> Result<Vec<Publication>, ContentServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdatePublicationInput,
    ) -> Result<Publication, ContentServiceError> {
        let mut publication = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("publication {}", id)))?;

        if let Some(title) = input.title {
            require_non_empty("Publication title", &title)?;
            publication.title = title;
        }
        if let Some(authors) = input.authors {
            require_non_empty("Publication authors", &authors)?;
            publication.authors = authors;
        }
        if let Some(venue) = input.venue {
            publication.venue = venue;
        }
        if let Some(year) = input.year {
            validate_year(year)?;
            publication.year = year;
        }
        if let Some(url) = input.url {
            publication.url = url;
        }
        if let Some(entry_type) = input.entry_type {
            publication.entry_type = entry_type;
        }
        if let Some(highlighted) = input.is_highlighted {
            publication.is_highlighted = highlighted;
        }
        publication.updated_at = Utc::now();

        Ok(self
            .repo
            .update(&publication)
            .await
            .context("Failed to update publication")?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ContentServiceError::NotFound(format!("publication {}", id)));
        }
        self.repo.delete(id).await?;
        tracing::info!(id, "Deleted publication");
        Ok(())
    }
}

fn validate_year(year: i32) -> Result<(), ContentServiceError> {
    if !(1000..=9999).contains(&year) {
        return Err(ContentServiceError::ValidationError(format!(
            "Publication year {} is out of range",
            year
        )));
    }
    Ok(())
}
