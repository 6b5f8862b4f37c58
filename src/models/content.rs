//! Heterogeneous content items
//!
//! Feeds mix blog posts, events and publications. `ContentItem` is the tagged
//! union they are merged as; serialized with a `kind` field so clients can
//! tell the variants apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlogPost, EventPost, Publication};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    BlogPost(BlogPost),
    EventPost(EventPost),
    Publication(Publication),
}

impl ContentItem {
    /// Creation timestamp, the feed ordering key
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::BlogPost(p) => p.created_at,
            Self::EventPost(e) => e.created_at,
            Self::Publication(p) => p.created_at,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        match self {
            Self::BlogPost(p) => p.is_highlighted,
            Self::EventPost(e) => e.is_highlighted,
            Self::Publication(p) => p.is_highlighted,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::BlogPost(p) => &p.title,
            Self::EventPost(e) => &e.title,
            Self::Publication(p) => &p.title,
        }
    }
}

impl From<BlogPost> for ContentItem {
    fn from(post: BlogPost) -> Self {
        Self::BlogPost(post)
    }
}

impl From<EventPost> for ContentItem {
    fn from(event: EventPost) -> Self {
        Self::EventPost(event)
    }
}

impl From<Publication> for ContentItem {
    fn from(publication: Publication) -> Self {
        Self::Publication(publication)
    }
}
