//! Page meta tags
//!
//! Builds the title, description and OpenGraph/Twitter/schema.org tags for a
//! page, falling back to the site defaults from configuration.

use crate::config::SiteConfig;
use crate::models::{MetaInput, MetaTag, MetaTags};

const DEFAULT_URL: &str = "/";
const DEFAULT_OBJECT_TYPE: &str = "website";

/// Build the meta tags for a page
///
/// Keywords are the page's own keywords (comma separated) followed by the
/// site default keywords; a keyword is listed once.
pub fn build_meta_tags(site: &SiteConfig, input: MetaInput) -> MetaTags {
    let title = non_blank(input.title).unwrap_or_else(|| site.default_title.clone());
    let description =
        non_blank(input.description).unwrap_or_else(|| site.default_description.clone());
    let url = non_blank(input.url).unwrap_or_else(|| DEFAULT_URL.to_string());
    let image = non_blank(input.image).unwrap_or_else(|| site.default_logo_url.clone());
    let object_type =
        non_blank(input.object_type).unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string());

    let mut keywords: Vec<String> = Vec::new();
    let given = input.keywords.unwrap_or_default();
    let page_keywords = given.split(',').map(str::trim).map(str::to_string);
    for keyword in page_keywords.chain(site.default_keywords.iter().cloned()) {
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    let tags = vec![
        MetaTag::name("description", description.as_str()),
        MetaTag::name("keywords", keywords.join(", ")),
        MetaTag::property("og:title", title.as_str()),
        MetaTag::property("og:description", description.as_str()),
        MetaTag::property("og:type", object_type.as_str()),
        MetaTag::property("og:url", url.as_str()),
        MetaTag::property("og:image", image.as_str()),
        MetaTag::name("twitter:card", "summary"),
        MetaTag::name("twitter:title", title.as_str()),
        MetaTag::name("twitter:description", description.as_str()),
        MetaTag::name("twitter:image", image.as_str()),
        MetaTag::itemprop("name", title.as_str()),
        MetaTag::itemprop("description", description.as_str()),
        MetaTag::itemprop("image", image.as_str()),
    ];

    MetaTags {
        title,
        description,
        keywords,
        url,
        image,
        object_type,
        tags,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            default_title: "Imaging Lab".to_string(),
            default_description: "Diffusion MRI research".to_string(),
            default_keywords: vec!["mri".to_string(), "open source".to_string()],
            default_logo_url: "/static/logo.png".to_string(),
        }
    }

    fn tag<'a>(meta: &'a MetaTags, key: &str) -> Option<&'a str> {
        meta.tags.iter().find(|t| t.key == key).map(|t| t.content.as_str())
    }

    #[test]
    fn test_defaults() {
        let meta = build_meta_tags(&site(), MetaInput::default());

        assert_eq!(meta.title, "Imaging Lab");
        assert_eq!(meta.url, "/");
        assert_eq!(meta.object_type, "website");
        assert_eq!(meta.keywords, vec!["mri", "open source"]);
        assert_eq!(tag(&meta, "og:image"), Some("/static/logo.png"));
    }

    #[test]
    fn test_page_keywords_come_first() {
        let input = MetaInput {
            title: Some("Tractography".into()),
            keywords: Some("tracking, mri ,streamlines".into()),
            object_type: Some("article".into()),
            ..Default::default()
        };
        let meta = build_meta_tags(&site(), input);

        assert_eq!(meta.keywords, vec!["tracking", "mri", "streamlines", "open source"]);
        assert_eq!(tag(&meta, "og:title"), Some("Tractography"));
        assert_eq!(tag(&meta, "twitter:title"), Some("Tractography"));
        assert_eq!(tag(&meta, "og:type"), Some("article"));
        assert_eq!(tag(&meta, "keywords"), Some("tracking, mri, streamlines, open source"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let input = MetaInput {
            description: Some("  ".into()),
            url: Some(String::new()),
            ..Default::default()
        };
        let meta = build_meta_tags(&site(), input);
        assert_eq!(meta.description, "Diffusion MRI research");
        assert_eq!(meta.url, "/");
    }
}
