//! Page meta tags

use serde::{Deserialize, Serialize};

/// Per-page overrides; anything left out falls back to the site defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Comma separated when taken from a query string
    pub keywords: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub object_type: Option<String>,
}

/// Resolved metadata for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub url: String,
    pub image: String,
    pub object_type: String,
    pub tags: Vec<MetaTag>,
}

/// A single `<meta>` element; `attribute` is `name` or `property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub attribute: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    pub fn name(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: "name",
            key: key.to_string(),
            content: content.into(),
        }
    }

    pub fn property(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: "property",
            key: key.to_string(),
            content: content.into(),
        }
    }

    pub fn itemprop(key: &str, content: impl Into<String>) -> Self {
        Self {
            attribute: "itemprop",
            key: key.to_string(),
            content: content.into(),
        }
    }
}
