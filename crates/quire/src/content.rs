use crate::error::{QuireError, Result};
use crate::parsing::{extract_summary, parse_content_date};
use crate::types::Frontmatter;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;

const POSTS_PREFIX: &str = "posts/";
const PAGES_PREFIX: &str = "pages/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Page,
}

impl ContentKind {
    pub fn classify(path: &str) -> Option<Self> {
        if path.starts_with(POSTS_PREFIX) {
            Some(Self::Post)
        } else if path.starts_with(PAGES_PREFIX) {
            Some(Self::Page)
        } else {
            None
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "post" => Some(Self::Post),
            "page" => Some(Self::Page),
            _ => None,
        }
    }
}

pub fn slug_for_path(path: &str) -> Option<&str> {
    path.strip_prefix(POSTS_PREFIX)
        .or_else(|| path.strip_prefix(PAGES_PREFIX))
        .filter(|slug| !slug.is_empty())
}

#[derive(Debug, Clone)]
pub struct RawContent {
    pub path: String,
    pub frontmatter: Frontmatter,
    pub source: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    pub path: String,
    pub slug: String,
    pub kind: ContentKind,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub body: String,
    pub author: Option<String>,
}

impl ContentItem {
    pub fn from_raw(raw: RawContent, summary_offset: usize) -> Result<Option<Self>> {
        let Some(path_kind) = ContentKind::classify(&raw.path) else {
            return Ok(None);
        };
        let Some(slug) = slug_for_path(&raw.path).map(String::from) else {
            return Ok(None);
        };

        let frontmatter = &raw.frontmatter;
        let kind = frontmatter
            .get_string("type")
            .and_then(|label| ContentKind::from_label(&label))
            .unwrap_or(path_kind);

        let (date, created) = match frontmatter.get_date_string("date") {
            Some(value) => {
                let (date, created) =
                    parse_content_date(&value).ok_or_else(|| QuireError::InvalidDate {
                        path: PathBuf::from(&raw.path),
                        value: value.clone(),
                    })?;
                (Some(date), created)
            }
            None => (None, None),
        };

        let updated = match frontmatter.get_date_string("updated") {
            Some(value) => Some(
                parse_content_date(&value)
                    .map(|(date, _)| date)
                    .ok_or_else(|| QuireError::InvalidDate {
                        path: PathBuf::from(&raw.path),
                        value: value.clone(),
                    })?,
            ),
            None => None,
        };

        let mut tags: Vec<String> = Vec::new();
        for tag in frontmatter.get_list("tags").unwrap_or_default() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let summary = frontmatter
            .get_string("summary")
            .or_else(|| extract_summary(&raw.source, summary_offset));

        Ok(Some(Self {
            title: frontmatter.get_string("title"),
            author: frontmatter.get_string("author"),
            path: raw.path,
            slug,
            kind,
            date,
            created,
            updated,
            tags,
            summary,
            body: raw.body,
        }))
    }

    pub fn is_eligible(&self) -> bool {
        self.kind == ContentKind::Post && self.date.is_some() && self.title.is_some()
    }

    pub fn effective_updated(&self) -> Option<NaiveDate> {
        self.updated.or(self.date)
    }

    pub fn author_or<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.author.as_deref().or(default)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}
