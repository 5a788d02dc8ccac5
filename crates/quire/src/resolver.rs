use crate::content::{ContentItem, slug_for_path};
use crate::error::{QuireError, Result};
use crate::repository::ContentRepository;

#[derive(Clone, Copy)]
pub struct SlugResolver<'a> {
    repository: &'a ContentRepository,
}

impl<'a> SlugResolver<'a> {
    pub fn new(repository: &'a ContentRepository) -> Self {
        Self { repository }
    }

    pub fn resolve(&self, slug: &str) -> Vec<&'a ContentItem> {
        self.repository.by_slug(slug.trim_matches('/'))
    }

    pub fn resolve_one(&self, slug: &str) -> Result<&'a ContentItem> {
        let mut matches = self.resolve(slug);
        match matches.len() {
            0 => Err(QuireError::not_found(format!("content '{slug}'"))),
            1 => Ok(matches.remove(0)),
            _ => Err(duplicate_error(slug, &matches)),
        }
    }

    /// Resolves the configured custom home page. A missing slug is a
    /// configuration error rather than a `NotFound`.
    pub fn resolve_home_page(&self, slug: &str) -> Result<&'a ContentItem> {
        self.resolve_one(slug).map_err(|error| match error {
            QuireError::NotFound { .. } => QuireError::HomePageNotFound {
                slug: slug.to_string(),
            },
            other => other,
        })
    }
}

fn duplicate_error(slug: &str, matches: &[&ContentItem]) -> QuireError {
    QuireError::DuplicateSlug {
        slug: slug.to_string(),
        path: matches[1].path.clone(),
        existing_path: matches[0].path.clone(),
    }
}

pub fn round_trips(repository: &ContentRepository, path: &str) -> bool {
    let Some(slug) = slug_for_path(path) else {
        return false;
    };
    matches!(
        SlugResolver::new(repository).resolve_one(slug),
        Ok(item) if item.path == path
    )
}
