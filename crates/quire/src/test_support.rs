use crate::content::{ContentItem, ContentKind};
use chrono::NaiveDate;

pub fn post(slug: &str, date: &str, tags: &[&str]) -> ContentItem {
    ContentItem {
        path: format!("posts/{slug}"),
        slug: slug.to_string(),
        kind: ContentKind::Post,
        title: Some(slug.to_string()),
        date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        created: None,
        updated: None,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        summary: None,
        body: format!("<p>{slug}</p>"),
        author: None,
    }
}

pub fn page(slug: &str) -> ContentItem {
    ContentItem {
        path: format!("pages/{slug}"),
        slug: slug.to_string(),
        kind: ContentKind::Page,
        title: Some(slug.to_string()),
        date: None,
        created: None,
        updated: None,
        tags: Vec::new(),
        summary: None,
        body: format!("<p>{slug}</p>"),
        author: None,
    }
}

pub fn numbered_posts(count: usize) -> Vec<ContentItem> {
    (0..count)
        .map(|index| {
            let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(index as u64);
            post(&format!("post-{index}"), &date.format("%Y-%m-%d").to_string(), &[])
        })
        .collect()
}
