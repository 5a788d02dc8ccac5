use crate::content::{ContentItem, slug_for_path};
use crate::error::{QuireError, Result};
use std::collections::HashMap;

pub fn validate_no_duplicates(items: &[ContentItem]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(items.len());

    for item in items {
        let Some(slug) = slug_for_path(&item.path) else {
            continue;
        };

        if let Some(existing_path) = seen.insert(slug, &item.path) {
            return Err(QuireError::DuplicateSlug {
                slug: slug.to_string(),
                path: item.path.clone(),
                existing_path: existing_path.to_string(),
            });
        }
    }

    tracing::debug!(count = seen.len(), "content slugs are unique");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, post};

    #[test]
    fn test_unique_slugs_pass() {
        let items = vec![post("hello", "2020-01-01", &[]), page("about")];
        assert!(validate_no_duplicates(&items).is_ok());
    }

    #[test]
    fn test_post_and_page_share_namespace() {
        let items = vec![
            post("about", "2020-01-01", &[]),
            post("hello", "2020-01-02", &[]),
            page("about"),
        ];
        match validate_no_duplicates(&items) {
            Err(QuireError::DuplicateSlug {
                slug,
                path,
                existing_path,
            }) => {
                assert_eq!(slug, "about");
                assert_eq!(path, "pages/about");
                assert_eq!(existing_path, "posts/about");
            }
            other => panic!("expected duplicate slug error, got {other:?}"),
        }
    }

    #[test]
    fn test_reports_first_collision() {
        let items = vec![
            page("a"),
            page("b"),
            page("b"),
            page("a"),
        ];
        match validate_no_duplicates(&items) {
            Err(QuireError::DuplicateSlug { slug, .. }) => assert_eq!(slug, "b"),
            other => panic!("expected duplicate slug error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(validate_no_duplicates(&[]).is_ok());
    }
}
