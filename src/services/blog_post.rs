//! Blog post service
//!
//! CRUD for lab blog posts: validation, identifier generation and
//! uniqueness checks on title and identifier.

use crate::db::repositories::BlogPostRepository;
use crate::models::{BlogPost, CreateBlogPostInput, UpdateBlogPostInput};
use crate::services::error::{require_non_empty, ContentServiceError};
use crate::services::slug::generate_slug;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

pub struct BlogPostService {
    repo: Arc<dyn BlogPostRepository>,
}

impl BlogPostService {
    pub fn new(repo: Arc<dyn BlogPostRepository>) -> Self {
        Self { repo }
    }

    /// Create a post, deriving the identifier from the title when absent
    pub async fn create(&self, input: CreateBlogPostInput) -> Result<BlogPost, ContentServiceError> {
        require_non_empty("Blog post title", &input.title)?;
        require_non_empty("Blog post body", &input.body)?;

        let identifier = match input.identifier.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given.to_string(),
            _ => generate_slug(&input.title),
        };
        require_non_empty("Blog post identifier", &identifier)?;

        self.ensure_unique(&input.title, &identifier, None).await?;

        let mut post = BlogPost::new(input.title, identifier, input.body, input.author);
        post.image_url = input.image_url;
        post.show_in_lab_blog = input.show_in_lab_blog;
        post.is_highlighted = input.is_highlighted;

        let created = self.repo.create(&post).await.context("Failed to create blog post")?;
        tracing::info!(id = created.id, identifier = %created.identifier, "Created blog post");
        Ok(created)
    }

    pub async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<BlogPost>, ContentServiceError> {
        Ok(self.repo.get_by_identifier(identifier).await?)
    }

    /// All posts including hidden ones, newest first
    pub async fn list(&self) -> Result<Vec<BlogPost>, ContentServiceError> {
        Ok(self.repo.list(None).await?)
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdateBlogPostInput,
    ) -> Result<BlogPost, ContentServiceError> {
        let mut post = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("blog post {}", id)))?;

        if let Some(title) = input.title {
            require_non_empty("Blog post title", &title)?;
            post.title = title;
        }
        if let Some(identifier) = input.identifier {
            require_non_empty("Blog post identifier", &identifier)?;
            post.identifier = identifier.trim().to_string();
        }
        if let Some(body) = input.body {
            require_non_empty("Blog post body", &body)?;
            post.body = body;
        }
        if let Some(author) = input.author {
            post.author = author;
        }
        if let Some(image_url) = input.image_url {
            post.image_url = image_url;
        }
        if let Some(show) = input.show_in_lab_blog {
            post.show_in_lab_blog = show;
        }
        if let Some(highlighted) = input.is_highlighted {
            post.is_highlighted = highlighted;
        }

        self.ensure_unique(&post.title, &post.identifier, Some(id)).await?;
        post.updated_at = Utc::now();

        let updated = self.repo.update(&post).await.context("Failed to update blog post")?;
        tracing::info!(id, "Updated blog post");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentServiceError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(ContentServiceError::NotFound(format!("blog post {}", id)));
        }
        self.repo.delete(id).await?;
        tracing::info!(id, "Deleted blog post");
        Ok(())
    }

    async fn ensure_unique(
        &self,
        title: &str,
        identifier: &str,
        current_id: Option<i64>,
    ) -> Result<(), ContentServiceError> {
        let is_other = |post: &BlogPost| Some(post.id) != current_id;

        if self.repo.get_by_title(title).await?.filter(is_other).is_some() {
            return Err(ContentServiceError::Conflict(format!("blog post title '{}'", title)));
        }
        if self
            .repo
            .get_by_identifier(identifier)
            .await?
            .filter(is_other)
            .is_some()
        {
            return Err(ContentServiceError::Conflict(format!(
                "blog post identifier '{}'",
                identifier
            )));
        }
        Ok(())
    }
}
