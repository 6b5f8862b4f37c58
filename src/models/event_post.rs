//! Event post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event entity (talks, workshops, releases)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPost {
    pub id: i64,
    pub title: String,
    pub identifier: String,
    /// Short summary shown in lists
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    /// Events without an end date never expire from the news feed
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub is_highlighted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventPost {
    pub fn new(title: String, identifier: String, start_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            identifier,
            description: String::new(),
            body: String::new(),
            location: None,
            start_date,
            end_date: None,
            is_highlighted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once `end_date` lies before `now`
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| end < now)
    }
}

/// Input for creating an event
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventPostInput {
    pub title: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_highlighted: bool,
}

/// Input for updating an event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventPostInput {
    pub title: Option<String>,
    pub identifier: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub location: Option<Option<String>>,
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub is_highlighted: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_has_ended() {
        let now = Utc::now();
        let mut event = EventPost::new("Workshop".into(), "workshop".into(), now - Duration::days(3));
        assert!(!event.has_ended(now));

        event.end_date = Some(now - Duration::days(1));
        assert!(event.has_ended(now));

        event.end_date = Some(now + Duration::days(1));
        assert!(!event.has_ended(now));
    }

    #[test]
    fn test_update_input_null_clears_and_missing_keeps() {
        let input: UpdateEventPostInput =
            serde_json::from_str(r#"{"end_date": null, "location": null}"#).unwrap();
        assert_eq!(input.end_date, Some(None));
        assert_eq!(input.location, Some(None));

        let input: UpdateEventPostInput = serde_json::from_str(r#"{"title": "Talk"}"#).unwrap();
        assert_eq!(input.end_date, None);
        assert_eq!(input.location, None);

        let input: UpdateEventPostInput =
            serde_json::from_str(r#"{"end_date": "2026-01-02T10:00:00Z"}"#).unwrap();
        assert!(matches!(input.end_date, Some(Some(_))));
    }
}
