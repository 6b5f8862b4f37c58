//! URL identifiers derived from titles

/// Generate a URL-friendly identifier from a title
///
/// Lowercases the title, turns spaces, underscores and ASCII punctuation into
/// hyphens, collapses hyphen runs and trims them from both ends. Non-ASCII
/// letters are kept as they are.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = false;

    for c in title.to_lowercase().chars() {
        let mapped = if c.is_ascii_alphanumeric() || !c.is_ascii() && c.is_alphanumeric() {
            c
        } else {
            '-'
        };

        if mapped == '-' {
            if !prev_hyphen && !slug.is_empty() {
                slug.push('-');
                prev_hyphen = true;
            }
        } else {
            slug.push(mapped);
            prev_hyphen = false;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_basic_titles() {
        assert_eq!(generate_slug("DIPY 1.7 Released!"), "dipy-1-7-released");
        assert_eq!(generate_slug("  Brain_Imaging   Workshop "), "brain-imaging-workshop");
        assert_eq!(generate_slug("---"), "");
    }

    #[test]
    fn test_keeps_non_ascii_letters() {
        assert_eq!(generate_slug("Café Ñandú"), "café-ñandú");
    }

    proptest! {
        #[test]
        fn slug_has_no_edge_or_double_hyphens(title in ".{0,60}") {
            let slug = generate_slug(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()));
        }
    }
}
