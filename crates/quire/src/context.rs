use crate::aggregate::{DateHistogram, TagHistogram};
use crate::content::ContentItem;
use crate::error::Result;
use crate::guard::validate_no_duplicates;
use crate::query::{PostQuery, QueryResult, query};
use crate::repository::ContentRepository;
use crate::resolver::SlugResolver;
use crate::types::SiteConfig;

/// What `/` renders. A custom home page is a rendering decision; the
/// underlying item keeps its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeView {
    Listing,
    Custom { slug: String },
}

#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub home: HomeView,
    repository: ContentRepository,
}

impl Site {
    pub fn new(config: SiteConfig, items: Vec<ContentItem>) -> Result<Self> {
        validate_no_duplicates(&items)?;
        let repository = ContentRepository::new(items);

        let home = match config.home_page_slug() {
            Some(slug) => {
                let item = SlugResolver::new(&repository).resolve_home_page(slug)?;
                HomeView::Custom {
                    slug: item.slug.clone(),
                }
            }
            None => HomeView::Listing,
        };

        tracing::info!(
            items = repository.len(),
            posts = repository.eligible().count(),
            pages = repository.pages().count(),
            "site loaded"
        );

        Ok(Self {
            config,
            home,
            repository,
        })
    }

    pub fn repository(&self) -> &ContentRepository {
        &self.repository
    }

    pub fn query(&self, filters: &PostQuery) -> Result<QueryResult<'_>> {
        query(self.repository.all(), filters, self.config.page_limit())
    }

    pub fn resolver(&self) -> SlugResolver<'_> {
        SlugResolver::new(&self.repository)
    }

    pub fn resolve_slug(&self, slug: &str) -> Vec<&ContentItem> {
        self.resolver().resolve(slug)
    }

    pub fn resolve_one(&self, slug: &str) -> Result<&ContentItem> {
        self.resolver().resolve_one(slug)
    }

    pub fn tag_histogram(&self) -> TagHistogram {
        TagHistogram::from_items(self.repository.all())
    }

    pub fn date_histogram(&self) -> DateHistogram {
        DateHistogram::from_items(self.repository.all())
    }

    pub fn pages(&self) -> Vec<&ContentItem> {
        self.repository.pages().collect()
    }

    pub fn validate_no_duplicates(&self) -> Result<()> {
        validate_no_duplicates(self.repository.all())
    }

    pub fn has_custom_home(&self) -> bool {
        matches!(self.home, HomeView::Custom { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;
    use crate::error::QuireError;
    use crate::test_support::{numbered_posts, page, post};

    fn config() -> SiteConfig {
        SiteConfig::new("Blog", "https://example.com")
    }

    #[test]
    fn test_duplicates_are_fatal() {
        let result = Site::new(config(), vec![post("about", "2020-01-01", &[]), page("about")]);
        assert!(matches!(result, Err(QuireError::DuplicateSlug { .. })));
    }

    #[test]
    fn test_listing_home_by_default() {
        let site = Site::new(config(), vec![page("about")]).unwrap();
        assert_eq!(site.home, HomeView::Listing);
        assert!(site.validate_no_duplicates().is_ok());
    }

    #[test]
    fn test_custom_home_page_keeps_kind() {
        let mut config = config();
        config.custom_home_page = Some("about".to_string());
        let site = Site::new(config, vec![page("about")]).unwrap();

        assert_eq!(
            site.home,
            HomeView::Custom {
                slug: "about".to_string()
            }
        );
        assert_eq!(site.resolve_one("about").unwrap().kind, ContentKind::Page);
    }

    #[test]
    fn test_missing_custom_home_page_is_fatal() {
        let mut config = config();
        config.custom_home_page = Some("welcome".to_string());
        let result = Site::new(config, vec![page("about")]);
        assert!(matches!(result, Err(QuireError::HomePageNotFound { .. })));
    }

    #[test]
    fn test_query_uses_configured_limit() {
        let mut config = config();
        config.limit = 4;
        let site = Site::new(config, numbered_posts(9)).unwrap();
        let result = site.query(&PostQuery::new().page_no(1)).unwrap();
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.meta.max_pages, 3);
    }

    #[test]
    fn test_pages_listing() {
        let site = Site::new(
            config(),
            vec![page("about"), post("a", "2020-01-01", &[]), page("contact")],
        )
        .unwrap();
        let slugs: Vec<&str> = site.pages().iter().map(|item| item.slug.as_str()).collect();
        assert_eq!(slugs, vec!["about", "contact"]);
    }
}
