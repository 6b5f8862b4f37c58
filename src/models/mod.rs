//! Data models
//!
//! Structures shared by the repositories, services and API:
//! - Database entities (BlogPost, EventPost, Publication, WebsiteSection)
//! - The `ContentItem` union that feeds are built from
//! - API input types and page meta tags

mod blog_post;
mod content;
mod event_post;
mod meta;
mod publication;
mod section;

pub use blog_post::{BlogPost, CreateBlogPostInput, UpdateBlogPostInput};
pub use content::ContentItem;
pub use event_post::{CreateEventPostInput, EventPost, UpdateEventPostInput};
pub use meta::{MetaInput, MetaTag, MetaTags};
pub use publication::{CreatePublicationInput, EntryType, Publication, UpdatePublicationInput};
pub use section::{CreateSectionInput, SectionType, UpdateSectionInput, WebsiteSection};

use serde::{Deserialize, Deserializer};

/// Deserializes a present field into `Some(value)`, so an explicit `null`
/// becomes `Some(None)` and a missing field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
