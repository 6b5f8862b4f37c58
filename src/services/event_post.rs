//! Event post service

use crate::db::repositories::EventPostRepository;
use crate::models::{CreateEventPostInput, EventPost, UpdateEventPostInput};
use crate::services::error::{require_non_empty, ContentServiceError};
use crate::services::slug::generate_slug;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

pub struct EventPostService {
    repo: Arc<dyn EventPostRepository>,
}

impl EventPostService {
    pub fn new(repo: Arc<dyn EventPostRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateEventPostInput) -> Result<EventPost, ContentServiceError> {
        require_non_empty("Event title", &input.title)?;

        let identifier = match input.identifier.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given.to_string(),
            _ => generate_slug(&input.title),
        };
        require_non_empty("Event identifier", &identifier)?;

        let mut event = EventPost::new(input.title, identifier, input.start_date);
        event.description = input.description;
        event.body = input.body;
        event.location = input.location;
        event.end_date = input.end_date;
        event.is_highlighted = input.is_highlighted;
        validate_dates(&event)?;

        self.ensure_unique(&event.title, &event.identifier, None).await?;

        let created = self.repo.create(&event).await.context("Failed to create event")?;
        tracing::info!(id = created.id, identifier = %created.identifier, "Created event");
        Ok(created)
    }

    pub async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<EventPost>, ContentServiceError> {
        Ok(self.repo.get_by_identifier(identifier).await?)
    }

    pub async fn list(&self) -> Result<Vec<EventPost>, ContentServiceError> {
        Ok(self.repo.list(None).await?)
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdateEventPostInput,
    ) -> Result<EventPost, ContentServiceError> {
        let mut event = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("event {}", id)))?;

        if let Some(title) = input.title {
            require_non_empty("Event title", &title)?;
            event.title = title;
        }
        if let Some(identifier) = input.identifier {
            require_non_empty("Event identifier", &identifier)?;
            event.identifier = identifier.trim().to_string();
        }
        if let Some(description) = input.description {
            event.description = description;
        }
        if let Some(body) = input.body {
            event.body = body;
        }
        if let Some(location) = input.location {
            event.location = location;
        }
        if let Some(start_date) = input.start_date {
            event.start_date = start_date;
        }
        if let Some(end_date) = input.end_date {
            event.end_date = end_date;
        }
        if let Some(highlighted) = input.is_highlighted {
            event.is_highlighted = highlighted;
        }
        validate_dates(&event)?;

        self.ensure_unique(&event.title, &event.identifier, Some(id)).await?;
        event.updated_at = Utc::now();

        let updated = self.repo.update(&event).await.context("Failed to update event")?;
        tracing::info!(id, "Updated event");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ContentServiceError::NotFound(format!("event {}", id)));
        }
        self.repo.delete(id).await?;
        tracing::info!(id, "Deleted event");
        Ok(())
    }

    async fn ensure_unique(
        &self,
        title: &str,
        identifier: &str,
        current_id: Option<i64>,
    ) -> Result<(), ContentServiceError> {
        let is_other = |event: &EventPost| Some(event.id) != current_id;

        if self.repo.get_by_title(title).await?.filter(is_other).is_some() {
            return Err(ContentServiceError::Conflict(format!("event title '{}'", title)));
        }
        if self
            .repo
            .get_by_identifier(identifier)
            .await?
            .filter(is_other)
            .is_some()
        {
            return Err(ContentServiceError::Conflict(format!(
                "event identifier '{}'",
                identifier
            )));
        }
        Ok(())
    }
}

fn validate_dates(event: &EventPost) -> Result<(), ContentServiceError> {
    match event.end_date {
        Some(end) if end < event.start_date => Err(ContentServiceError::ValidationError(
            "Event end date is before its start date".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxEventPostRepository;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;

    async fn setup_service() -> EventPostService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        EventPostService::new(SqlxEventPostRepository::boxed(pool))
    }

    fn input(title: &str) -> CreateEventPostInput {
        CreateEventPostInput {
            title: title.to_string(),
            identifier: None,
            description: "Two days of tutorials".to_string(),
            body: String::new(),
            location: Some("Bloomington".to_string()),
            start_date: Utc::now() + Duration::days(30),
            end_date: None,
            is_highlighted: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let service = setup_service().await;
        let event = service.create(input("DIPY Workshop 2025")).await.unwrap();

        assert_eq!(event.identifier, "dipy-workshop-2025");
        let found = service.get_by_identifier(&event.identifier).await.unwrap().unwrap();
        assert_eq!(found.location.as_deref(), Some("Bloomington"));
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let service = setup_service().await;
        let mut bad = input("Backwards");
        bad.end_date = Some(bad.start_date - Duration::days(1));

        let result = service.create(bad).await;
        assert!(matches!(result, Err(ContentServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_duplicate_identifier_is_conflict() {
        let service = setup_service().await;
        service.create(input("Sprint")).await.unwrap();

        let mut again = input("Another sprint");
        again.identifier = Some("sprint".into());
        assert!(matches!(
            service.create(again).await,
            Err(ContentServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_clears_location_and_delete() {
        let service = setup_service().await;
        let event = service.create(input("Tutorial")).await.unwrap();

        let updated = service
            .update(
                event.id,
                UpdateEventPostInput {
                    location: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.location.is_none());

        service.delete(event.id).await.unwrap();
        assert!(service.get_by_identifier(&event.identifier).await.unwrap().is_none());
    }
}
