//! Website section model
//!
//! Sections are the navigable building blocks of the site. A `fixed` section
//! is a slot rendered by the front page (e.g. "about"); a `page` section has
//! its own URL under its position id.

use serde::{Deserialize, Serialize};

/// Website section type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Fixed,
    Page,
}

impl Default for SectionType {
    fn default() -> Self {
        Self::Page
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Page => write!(f, "page"),
        }
    }
}

impl std::str::FromStr for SectionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "page" => Ok(Self::Page),
            _ => Err(anyhow::anyhow!("Invalid section type: {}", s)),
        }
    }
}

/// Website section model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteSection {
    pub id: i64,
    pub title: String,
    /// Unique slug addressing the section
    pub website_position_id: String,
    pub section_type: SectionType,
    pub body: String,
    pub show_in_nav: bool,
    pub sort_order: i32,
}

impl WebsiteSection {
    pub fn new(title: String, website_position_id: String, section_type: SectionType) -> Self {
        Self {
            id: 0,
            title,
            website_position_id,
            section_type,
            body: String::new(),
            show_in_nav: false,
            sort_order: 0,
        }
    }
}

/// Input for creating a section
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSectionInput {
    pub title: String,
    #[serde(default)]
    pub website_position_id: Option<String>,
    #[serde(default)]
    pub section_type: SectionType,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub show_in_nav: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Input for updating a section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSectionInput {
    pub title: Option<String>,
    pub website_position_id: Option<String>,
    pub section_type: Option<SectionType>,
    pub body: Option<String>,
    pub show_in_nav: Option<bool>,
    pub sort_order: Option<i32>,
}
