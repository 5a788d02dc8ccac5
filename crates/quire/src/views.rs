use crate::content::{ContentItem, ContentKind};
use crate::context::{HomeView, Site};
use crate::error::{QuireError, Result};
use crate::feeds::{FEED_PATH, generate_atom};
use crate::query::PostQuery;
use crate::sitemap::{SITEMAP_PATH, generate_sitemap};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Index,
    IndexPage(usize),
    Tags,
    Tag(String),
    TagPage(String, usize),
    ListPosts,
    ListPages,
    Archive,
    YearArchive(i32),
    MonthArchive(i32, u32),
    Feed,
    Sitemap,
    Content(String),
}

impl Route {
    pub fn static_routes() -> [Route; 6] {
        [
            Route::Index,
            Route::Tags,
            Route::ListPosts,
            Route::ListPages,
            Route::Archive,
            Route::Feed,
        ]
    }

    pub fn parse(path: &str) -> Option<Route> {
        let trimmed = path.trim_matches('/');

        match trimmed {
            "" => return Some(Route::Index),
            FEED_PATH => return Some(Route::Feed),
            SITEMAP_PATH => return Some(Route::Sitemap),
            "tags" => return Some(Route::Tags),
            "archive" => return Some(Route::Archive),
            "list/posts" => return Some(Route::ListPosts),
            "list/pages" => return Some(Route::ListPages),
            _ => {}
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        let parsed = match segments.as_slice() {
            ["pages", number] => number.parse::<usize>().ok().map(Route::IndexPage),
            ["tags", tag] => decode(tag).map(Route::Tag),
            ["tags", tag, "pages", number] => decode(tag)
                .zip(number.parse::<usize>().ok())
                .map(|(tag, page_no)| Route::TagPage(tag, page_no)),
            ["archive", year] => year.parse::<i32>().ok().map(Route::YearArchive),
            ["archive", year, month] => year
                .parse::<i32>()
                .ok()
                .zip(month.parse::<u32>().ok())
                .map(|(year, month)| Route::MonthArchive(year, month)),
            _ => None,
        };

        parsed.or_else(|| {
            let slug = decode(trimmed)?;
            (!slug.is_empty()).then_some(Route::Content(slug))
        })
    }

    pub fn url(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::IndexPage(page_no) => format!("/pages/{page_no}/"),
            Route::Tags => "/tags/".to_string(),
            Route::Tag(tag) => format!("/tags/{}/", urlencoding::encode(tag)),
            Route::TagPage(tag, page_no) => {
                format!("/tags/{}/pages/{page_no}/", urlencoding::encode(tag))
            }
            Route::ListPosts => "/list/posts/".to_string(),
            Route::ListPages => "/list/pages/".to_string(),
            Route::Archive => "/archive/".to_string(),
            Route::YearArchive(year) => format!("/archive/{year}/"),
            Route::MonthArchive(year, month) => format!("/archive/{year}/{month}/"),
            Route::Feed => format!("/{FEED_PATH}"),
            Route::Sitemap => format!("/{SITEMAP_PATH}"),
            Route::Content(slug) => {
                let encoded: Vec<String> = slug
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect();
                format!("/{}/", encoded.join("/"))
            }
        }
    }
}

fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|decoded| decoded.into_owned())
}

#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub template: &'static str,
    pub context: Value,
}

#[derive(Debug, Clone)]
pub enum Rendered {
    View(View),
    Xml {
        content_type: &'static str,
        body: String,
    },
    Redirect(String),
}

#[derive(Debug, Serialize)]
pub struct ItemView<'a> {
    pub slug: &'a str,
    pub url: String,
    pub kind: ContentKind,
    pub title: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub updated: Option<NaiveDate>,
    pub tags: &'a [String],
    pub summary: Option<&'a str>,
    pub author: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
}

impl<'a> ItemView<'a> {
    fn new(item: &'a ContentItem, default_author: Option<&'a str>, with_body: bool) -> Self {
        Self {
            slug: &item.slug,
            url: item.url(),
            kind: item.kind,
            title: item.title.as_deref(),
            date: item.date,
            updated: item.effective_updated(),
            tags: &item.tags,
            summary: item.summary.as_deref(),
            author: item.author_or(default_author),
            body: with_body.then_some(item.body.as_str()),
        }
    }
}

fn view(template: &'static str, context: Value) -> Rendered {
    Rendered::View(View { template, context })
}

impl Site {
    fn listing<'a>(&'a self, items: &[&'a ContentItem]) -> Vec<ItemView<'a>> {
        let author = self.config.author.as_deref();
        items
            .iter()
            .map(|item| ItemView::new(item, author, false))
            .collect()
    }

    pub fn render(&self, route: &Route) -> Result<Rendered> {
        self.render_at(route, Local::now().date_naive())
    }

    pub fn render_at(&self, route: &Route, today: NaiveDate) -> Result<Rendered> {
        match route {
            Route::Index => match &self.home {
                HomeView::Listing => self.render_index_page(1),
                HomeView::Custom { slug } => self.render_content(slug, true),
            },
            Route::IndexPage(1) if !self.has_custom_home() => {
                Ok(Rendered::Redirect(Route::Index.url()))
            }
            Route::IndexPage(page_no) => self.render_index_page(*page_no),
            Route::Tags => {
                let histogram = self.tag_histogram();
                Ok(view(
                    "tags.html",
                    json!({ "tags": histogram.tags, "max_occ": histogram.max_count }),
                ))
            }
            Route::Tag(tag) => self.render_tag(tag, 1),
            Route::TagPage(tag, 1) => Ok(Rendered::Redirect(Route::Tag(tag.clone()).url())),
            Route::TagPage(tag, page_no) => self.render_tag(tag, *page_no),
            Route::ListPosts => {
                let result = self.query(&PostQuery::new())?;
                Ok(view(
                    "list_posts.html",
                    json!({ "posts": self.listing(&result.items) }),
                ))
            }
            Route::ListPages => {
                let pages = self.pages();
                Ok(view(
                    "list_pages.html",
                    json!({ "pages": self.listing(&pages) }),
                ))
            }
            Route::Archive => Ok(view(
                "archive.html",
                json!({ "archive": self.date_histogram().years }),
            )),
            Route::YearArchive(year) => {
                let result = self.query(&PostQuery::new().year(*year).abort(true))?;
                Ok(view(
                    "archive_page.html",
                    json!({
                        "year": year,
                        "label": year.to_string(),
                        "posts": self.listing(&result.items),
                    }),
                ))
            }
            Route::MonthArchive(year, month) => {
                let first_day = NaiveDate::from_ymd_opt(*year, *month, 1).ok_or_else(|| {
                    QuireError::not_found(format!("archive {year}/{month}"))
                })?;
                let result =
                    self.query(&PostQuery::new().year(*year).month(*month).abort(true))?;
                Ok(view(
                    "archive_page.html",
                    json!({
                        "year": year,
                        "month": month,
                        "label": first_day.format("%b %Y").to_string(),
                        "posts": self.listing(&result.items),
                    }),
                ))
            }
            Route::Feed => Ok(Rendered::Xml {
                content_type: "application/atom+xml",
                body: generate_atom(self)?,
            }),
            Route::Sitemap => Ok(Rendered::Xml {
                content_type: "application/xml",
                body: generate_sitemap(self, today),
            }),
            Route::Content(slug) => self.render_content(slug, false),
        }
    }

    fn render_index_page(&self, page_no: usize) -> Result<Rendered> {
        let result = self.query(
            &PostQuery::new()
                .page_no(page_no)
                .abort(page_no != 1 || self.has_custom_home()),
        )?;
        Ok(view(
            "index.html",
            json!({
                "page_no": page_no,
                "posts": self.listing(&result.items),
                "next_page": result.meta.has_next(page_no),
                "previous_page": result.meta.has_previous(page_no),
                "max_pages": result.meta.max_pages,
            }),
        ))
    }

    fn render_tag(&self, tag: &str, page_no: usize) -> Result<Rendered> {
        let result = self.query(&PostQuery::new().tag(tag).page_no(page_no).abort(true))?;
        Ok(view(
            "tag.html",
            json!({
                "tag": tag,
                "page_no": page_no,
                "posts": self.listing(&result.items),
                "next_page": result.meta.has_next(page_no),
                "previous_page": result.meta.has_previous(page_no),
                "len": result.meta.total_count,
            }),
        ))
    }

    fn render_content(&self, slug: &str, is_home: bool) -> Result<Rendered> {
        let item = self.resolve_one(slug)?;
        Ok(view(
            "content.html",
            json!({
                "content": ItemView::new(item, self.config.author.as_deref(), true),
                "is_home": is_home,
            }),
        ))
    }

    pub fn routes(&self) -> Result<Vec<Route>> {
        let mut routes = vec![Route::Index];

        let index_pages = self.query(&PostQuery::new().page_no(1))?.meta.max_pages;
        let first_listed = if self.has_custom_home() { 1 } else { 2 };
        routes.extend((first_listed..=index_pages).map(Route::IndexPage));

        routes.push(Route::Tags);
        let limit = self.config.page_limit();
        for tag in self.tag_histogram().tags {
            let pages = tag.count.div_ceil(limit);
            routes.extend((2..=pages).map(|page_no| Route::TagPage(tag.name.clone(), page_no)));
            routes.push(Route::Tag(tag.name));
        }

        routes.push(Route::ListPosts);
        routes.push(Route::ListPages);

        routes.push(Route::Archive);
        for year in self.date_histogram().years {
            routes.push(Route::YearArchive(year.year));
            routes.extend(
                year.months
                    .iter()
                    .map(|month| Route::MonthArchive(year.year, month.month)),
            );
        }

        routes.push(Route::Feed);
        routes.push(Route::Sitemap);

        routes.extend(
            self.repository()
                .all()
                .iter()
                .map(|item| Route::Content(item.slug.clone())),
        );

        Ok(routes)
    }
}
