//! Publication model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bibliographic entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Article,
    Inproceedings,
    Book,
    Misc,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Inproceedings => write!(f, "inproceedings"),
            Self::Book => write!(f, "book"),
            Self::Misc => write!(f, "misc"),
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "inproceedings" => Ok(Self::Inproceedings),
            "book" => Ok(Self::Book),
            "misc" => Ok(Self::Misc),
            _ => Err(anyhow::anyhow!("Invalid entry type: {}", s)),
        }
    }
}

/// Publication entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    /// Author list as displayed, e.g. "Doe J, Roe R"
    pub authors: String,
    /// Journal, conference or publisher
    pub venue: String,
    pub year: i32,
    #[serde(default)]
    pub url: Option<String>,
    pub entry_type: EntryType,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Publication {
    pub fn new(title: String, authors: String, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            authors,
            venue: String::new(),
            year,
            url: None,
            entry_type: EntryType::default(),
            is_highlighted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublicationInput {
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub venue: String,
    pub year: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub is_highlighted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePublicationInput {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub venue: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub url: Option<Option<String>>,
    pub entry_type: Option<EntryType>,
    pub is_highlighted: Option<bool>,
}
