use crate::content::ContentItem;
use crate::error::{QuireError, Result};
use chrono::Datelike;
use serde::Serialize;

const FALLBACK_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub sort: bool,
    pub reverse: bool,
    pub tag: Option<String>,
    pub year: Option<i32>,
    /// Only applied together with `year`.
    pub month: Option<u32>,
    pub page_no: Option<usize>,
    pub limit: Option<usize>,
    pub abort: bool,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            sort: true,
            reverse: true,
            tag: None,
            year: None,
            month: None,
            page_no: None,
            limit: None,
            abort: false,
        }
    }
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    // Empty tags and zero years or months leave the filter unset.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        let tag: String = tag.into();
        self.tag = (!tag.is_empty()).then_some(tag);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = (year != 0).then_some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = (month != 0).then_some(month);
        self
    }

    pub fn page_no(mut self, page_no: usize) -> Self {
        self.page_no = Some(page_no);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn abort(mut self, abort: bool) -> Self {
        self.abort = abort;
        self
    }

    fn describe(&self) -> String {
        let mut parts = vec!["posts".to_string()];
        if let Some(tag) = &self.tag {
            parts.push(format!("tag={tag}"));
        }
        if let Some(year) = self.year {
            parts.push(format!("year={year}"));
            if let Some(month) = self.month {
                parts.push(format!("month={month}"));
            }
        }
        if let Some(page_no) = self.page_no {
            parts.push(format!("page={page_no}"));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QueryMeta {
    pub total_count: usize,
    pub max_pages: usize,
}

impl QueryMeta {
    pub fn has_next(&self, page_no: usize) -> bool {
        page_no < self.max_pages
    }

    pub fn has_previous(&self, page_no: usize) -> bool {
        page_no > 1
    }
}

#[derive(Debug)]
pub struct QueryResult<'a> {
    pub items: Vec<&'a ContentItem>,
    pub meta: QueryMeta,
}

pub fn query<'a, I>(items: I, filters: &PostQuery, default_limit: usize) -> Result<QueryResult<'a>>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut posts: Vec<&ContentItem> = items.into_iter().filter(|item| item.is_eligible()).collect();

    if filters.sort {
        // `sort_by` is stable, so equal dates keep load order in both directions.
        if filters.reverse {
            posts.sort_by(|left, right| right.date.cmp(&left.date));
        } else {
            posts.sort_by(|left, right| left.date.cmp(&right.date));
        }
    }

    if let Some(tag) = &filters.tag {
        posts.retain(|item| item.has_tag(tag));
    }

    if let Some(year) = filters.year {
        posts.retain(|item| item.date.is_some_and(|date| date.year() == year));

        if let Some(month) = filters.month {
            posts.retain(|item| item.date.is_some_and(|date| date.month() == month));
        }
    }

    let total_count = posts.len();
    let limit = resolve_limit(filters.limit, default_limit);
    let mut chunks: Vec<Vec<&ContentItem>> =
        posts.chunks(limit).map(|chunk| chunk.to_vec()).collect();
    let meta = QueryMeta {
        total_count,
        max_pages: chunks.len(),
    };

    let selected = match filters.page_no {
        Some(page_no) if (1..=chunks.len()).contains(&page_no) => chunks.swap_remove(page_no - 1),
        Some(_) => Vec::new(),
        None => posts,
    };

    if selected.is_empty() && filters.abort {
        return Err(QuireError::not_found(filters.describe()));
    }

    Ok(QueryResult {
        items: selected,
        meta,
    })
}

fn resolve_limit(requested: Option<usize>, default_limit: usize) -> usize {
    requested
        .filter(|&limit| limit > 0)
        .or(Some(default_limit).filter(|&limit| limit > 0))
        .unwrap_or(FALLBACK_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{numbered_posts, page, post};

    fn slugs(result: &QueryResult<'_>) -> Vec<String> {
        result.items.iter().map(|item| item.slug.clone()).collect()
    }

    #[test]
    fn test_pagination_scenario() {
        let items = numbered_posts(25);
        let filters = PostQuery::new().limit(10);

        let first = query(&items, &filters.clone().page_no(1), 10).unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.meta.max_pages, 3);
        assert_eq!(first.meta.total_count, 25);

        let third = query(&items, &filters.clone().page_no(3), 10).unwrap();
        assert_eq!(third.items.len(), 5);

        let fourth = query(&items, &filters.clone().page_no(4), 10).unwrap();
        assert!(fourth.items.is_empty());
        assert_eq!(fourth.meta.max_pages, 3);
    }

    #[test]
    fn test_out_of_range_page_with_abort_is_not_found() {
        let items = numbered_posts(5);
        let result = query(&items, &PostQuery::new().page_no(2).abort(true), 10);
        assert!(matches!(result, Err(QuireError::NotFound { .. })));
    }

    #[test]
    fn test_page_zero_selects_nothing() {
        let items = numbered_posts(5);
        let result = query(&items, &PostQuery::new().page_no(0), 10).unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.meta.max_pages, 1);
    }

    #[test]
    fn test_max_pages_matches_ceiling_for_every_limit() {
        let items = numbered_posts(23);
        for limit in 1..=30 {
            let result = query(&items, &PostQuery::new().limit(limit).page_no(1), 10).unwrap();
            assert_eq!(result.meta.max_pages, 23usize.div_ceil(limit));
            assert!(result.items.len() <= limit);
        }
    }

    #[test]
    fn test_empty_result_without_abort() {
        let items: Vec<ContentItem> = Vec::new();
        let result = query(&items, &PostQuery::new().page_no(1), 10).unwrap();
        assert!(result.items.is_empty());
        assert_eq!(result.meta, QueryMeta::default());
    }

    #[test]
    fn test_empty_result_with_abort() {
        let items = vec![post("a", "2020-01-01", &["rust"])];
        let result = query(&items, &PostQuery::new().tag("go").abort(true), 10);
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let items = vec![
            post("old", "2019-05-01", &[]),
            post("new", "2021-05-01", &[]),
            post("mid", "2020-05-01", &[]),
        ];
        let result = query(&items, &PostQuery::new(), 10).unwrap();
        assert_eq!(slugs(&result), vec!["new", "mid", "old"]);

        let ascending = query(&items, &PostQuery::new().reverse(false), 10).unwrap();
        assert_eq!(slugs(&ascending), vec!["old", "mid", "new"]);

        let unsorted = query(&items, &PostQuery::new().sort(false), 10).unwrap();
        assert_eq!(slugs(&unsorted), vec!["old", "new", "mid"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let items = vec![
            post("first", "2020-01-01", &[]),
            post("later", "2021-01-01", &[]),
            post("second", "2020-01-01", &[]),
            post("third", "2020-01-01", &[]),
        ];
        let descending = query(&items, &PostQuery::new(), 10).unwrap();
        assert_eq!(slugs(&descending), vec!["later", "first", "second", "third"]);

        let ascending = query(&items, &PostQuery::new().reverse(false), 10).unwrap();
        assert_eq!(slugs(&ascending), vec!["first", "second", "third", "later"]);
    }

    #[test]
    fn test_ineligible_items_are_excluded() {
        let mut untitled = post("untitled", "2020-01-01", &[]);
        untitled.title = None;
        let mut undated = post("undated", "2020-01-01", &[]);
        undated.date = None;
        let items = vec![untitled, undated, page("about"), post("ok", "2020-01-01", &[])];

        let result = query(&items, &PostQuery::new(), 10).unwrap();
        assert_eq!(slugs(&result), vec!["ok"]);
    }

    #[test]
    fn test_tag_filter() {
        let items = vec![
            post("a", "2020-01-01", &["rust", "web"]),
            post("b", "2020-01-02", &["web"]),
            post("c", "2020-01-03", &["go"]),
        ];
        let result = query(&items, &PostQuery::new().tag("web"), 10).unwrap();
        assert_eq!(slugs(&result), vec!["b", "a"]);
        assert_eq!(result.meta.total_count, 2);
    }

    #[test]
    fn test_year_and_month_filters() {
        let items = vec![
            post("jan", "2020-01-10", &[]),
            post("feb", "2020-02-10", &[]),
            post("next", "2021-01-10", &[]),
        ];
        let year = query(&items, &PostQuery::new().year(2020), 10).unwrap();
        assert_eq!(slugs(&year), vec!["feb", "jan"]);

        let month = query(&items, &PostQuery::new().year(2020).month(1), 10).unwrap();
        assert_eq!(slugs(&month), vec!["jan"]);
    }

    #[test]
    fn test_month_without_year_is_ignored() {
        let items = vec![
            post("jan", "2020-01-10", &[]),
            post("feb", "2020-02-10", &[]),
        ];
        let all = query(&items, &PostQuery::new(), 10).unwrap();
        let month_only = query(&items, &PostQuery::new().month(3), 10).unwrap();
        assert_eq!(slugs(&all), slugs(&month_only));
    }

    #[test]
    fn test_empty_tag_and_zero_dates_do_not_filter() {
        let items = vec![
            post("jan", "2020-01-10", &["rust"]),
            post("feb", "2021-02-10", &[]),
        ];
        let all = query(&items, &PostQuery::new(), 10).unwrap();
        let unset = PostQuery::new().tag("").year(0).month(0);
        assert_eq!(unset, PostQuery::new());
        assert_eq!(slugs(&query(&items, &unset, 10).unwrap()), slugs(&all));

        let year_only = PostQuery::new().year(2020).month(0);
        assert_eq!(slugs(&query(&items, &year_only, 10).unwrap()), vec!["jan"]);
    }

    #[test]
    fn test_default_limit_applies() {
        let items = numbered_posts(7);
        let result = query(&items, &PostQuery::new().page_no(1), 3).unwrap();
        assert_eq!(result.items.len(), 3);
        assert_eq!(result.meta.max_pages, 3);

        let zero = query(&items, &PostQuery::new().limit(0).page_no(1), 0).unwrap();
        assert_eq!(zero.items.len(), 7);
        assert_eq!(zero.meta.max_pages, 1);
    }

    #[test]
    fn test_without_page_returns_everything() {
        let items = numbered_posts(12);
        let result = query(&items, &PostQuery::new().limit(5), 10).unwrap();
        assert_eq!(result.items.len(), 12);
        assert_eq!(result.meta.max_pages, 3);
    }

    #[test]
    fn test_navigation_flags() {
        let meta = QueryMeta {
            total_count: 25,
            max_pages: 3,
        };
        assert!(meta.has_next(2));
        assert!(!meta.has_next(3));
        assert!(meta.has_previous(2));
        assert!(!meta.has_previous(1));
    }
}
