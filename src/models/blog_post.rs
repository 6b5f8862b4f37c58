//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    /// Unique title
    pub title: String,
    /// Unique URL slug
    pub identifier: String,
    /// Markdown body
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the post is listed in the lab blog and the news feed
    pub show_in_lab_blog: bool,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn new(title: String, identifier: String, body: String, author: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by database
            title,
            identifier,
            body,
            author,
            image_url: None,
            show_in_lab_blog: true,
            is_highlighted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a blog post
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlogPostInput {
    pub title: String,
    /// Generated from the title when omitted
    #[serde(default)]
    pub identifier: Option<String>,
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_show_in_lab_blog")]
    pub show_in_lab_blog: bool,
    #[serde(default)]
    pub is_highlighted: bool,
}

fn default_show_in_lab_blog() -> bool {
    true
}

/// Input for updating a blog post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlogPostInput {
    pub title: Option<String>,
    pub identifier: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub image_url: Option<Option<String>>,
    pub show_in_lab_blog: Option<bool>,
    pub is_highlighted: Option<bool>,
}
