use crate::content::{ContentItem, ContentKind};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ContentRepository {
    items: Vec<ContentItem>,
    slug_index: HashMap<String, Vec<usize>>,
}

impl ContentRepository {
    pub fn new(items: Vec<ContentItem>) -> Self {
        let mut slug_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, item) in items.iter().enumerate() {
            slug_index.entry(item.slug.clone()).or_default().push(position);
        }
        Self { items, slug_index }
    }

    pub fn all(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn by_slug(&self, slug: &str) -> Vec<&ContentItem> {
        self.slug_index
            .get(slug)
            .map(|positions| positions.iter().map(|&position| &self.items[position]).collect())
            .unwrap_or_default()
    }

    pub fn eligible(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.iter().filter(|item| item.is_eligible())
    }

    pub fn pages(&self) -> impl Iterator<Item = &ContentItem> {
        self.items
            .iter()
            .filter(|item| item.kind == ContentKind::Page)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{page, post};

    #[test]
    fn test_all_keeps_load_order() {
        let repository = ContentRepository::new(vec![
            post("b", "2020-01-02", &[]),
            post("a", "2020-01-01", &[]),
            page("about"),
        ]);
        let slugs: Vec<&str> = repository.all().iter().map(|item| item.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a", "about"]);
        assert_eq!(repository.len(), 3);
    }

    #[test]
    fn test_by_slug() {
        let repository = ContentRepository::new(vec![post("hello", "2020-01-01", &[]), page("about")]);
        assert_eq!(repository.by_slug("about").len(), 1);
        assert_eq!(repository.by_slug("about")[0].kind, ContentKind::Page);
        assert!(repository.by_slug("missing").is_empty());
    }

    #[test]
    fn test_by_slug_reports_every_duplicate() {
        let repository = ContentRepository::new(vec![post("about", "2020-01-01", &[]), page("about")]);
        assert_eq!(repository.by_slug("about").len(), 2);
    }

    #[test]
    fn test_eligible_and_pages() {
        let repository = ContentRepository::new(vec![
            post("a", "2020-01-01", &[]),
            page("about"),
        ]);
        assert_eq!(repository.eligible().count(), 1);
        assert_eq!(repository.pages().count(), 1);
    }
}
