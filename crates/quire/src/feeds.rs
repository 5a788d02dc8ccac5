use crate::content::ContentItem;
use crate::context::Site;
use crate::error::Result;
use crate::query::PostQuery;
use crate::xml::escape;
use chrono::{NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

pub const FEED_PATH: &str = "recent.atom";
const FEED_TITLE: &str = "Recent Articles";

fn rfc3339(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn entry(site: &Site, post: &ContentItem, feed_url: &str) -> String {
    let url = site.config.absolute_url(&post.url());
    let published = post.date.map(rfc3339).unwrap_or_default();
    let updated = post.effective_updated().map(rfc3339).unwrap_or_default();
    let author = post
        .author_or(site.config.author.as_deref())
        .unwrap_or(&site.config.title);

    format!(
        r#"  <entry xml:base="{feed_url}">
    <title type="text">{title}</title>
    <id>{url}</id>
    <link href="{url}" rel="alternate"/>
    <published>{published}</published>
    <updated>{updated}</updated>
    <author>
      <name>{author}</name>
    </author>
    <content type="html">{content}</content>
  </entry>
"#,
        feed_url = escape(feed_url),
        title = escape(post.title.as_deref().unwrap_or_default()),
        url = escape(&url),
        published = published,
        updated = updated,
        author = escape(author),
        content = escape(&post.body),
    )
}

pub fn generate_atom(site: &Site) -> Result<String> {
    let result = site.query(&PostQuery::new())?;
    let posts: Vec<&ContentItem> = result
        .items
        .into_iter()
        .take(site.config.feed_limit)
        .collect();

    let feed_url = site.config.absolute_url(FEED_PATH);
    let home_url = site.config.absolute_url("/");

    let updated = posts
        .iter()
        .filter_map(|post| post.effective_updated())
        .max()
        .map(rfc3339)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let entries: String = posts
        .iter()
        .map(|post| entry(site, post, &feed_url))
        .collect();

    Ok(format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="text">{title}</title>
  <id>{feed_url}</id>
  <updated>{updated}</updated>
  <link href="{home_url}"/>
  <link href="{feed_url}" rel="self"/>
  <generator>quire</generator>
{entries}</feed>
"#,
        title = FEED_TITLE,
        feed_url = escape(&feed_url),
        updated = updated,
        home_url = escape(&home_url),
        entries = entries,
    ))
}
