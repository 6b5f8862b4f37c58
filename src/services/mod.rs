//! Services layer - Business logic
//!
//! Services sit between the HTTP API and the repositories. They are
//! responsible for:
//! - Validation, identifier generation and uniqueness rules
//! - Building the news and highlight feeds
//! - Talking to third-party social APIs and caching their answers

pub mod blog_post;
pub mod error;
pub mod event_post;
pub mod feed;
pub mod meta;
pub mod publication;
pub mod section;
pub mod slug;
pub mod social;

pub use blog_post::BlogPostService;
pub use error::ContentServiceError;
pub use event_post::EventPostService;
pub use feed::{aggregate, select_highlights, FeedService};
pub use meta::build_meta_tags;
pub use publication::PublicationService;
pub use section::SectionService;
pub use slug::generate_slug;
pub use social::{SocialClient, SocialError, SocialFeedService, SocialSource};
