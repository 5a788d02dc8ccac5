use crate::context::Site;
use crate::views::Route;
use crate::xml::escape;
use chrono::{Days, NaiveDate};

pub const SITEMAP_PATH: &str = "sitemap.xml";

/// Listing routes without parameters are stamped ten days back; content
/// items use their update date, then their date.
const STATIC_AGE_DAYS: u64 = 10;

pub fn generate_sitemap(site: &Site, today: NaiveDate) -> String {
    let fallback = today
        .checked_sub_days(Days::new(STATIC_AGE_DAYS))
        .unwrap_or(today);

    let mut urls = String::new();
    let mut push = |url: &str, modified: NaiveDate| {
        urls.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            escape(&site.config.absolute_url(url)),
            modified.format("%Y-%m-%d")
        ));
    };

    for route in Route::static_routes() {
        push(&route.url(), fallback);
    }

    for item in site.repository().all() {
        push(&item.url(), item.effective_updated().unwrap_or(fallback));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}</urlset>
"#,
        urls
    )
}
