pub mod aggregate;
pub mod content;
pub mod context;
pub mod error;
pub mod feeds;
pub mod freeze;
pub mod guard;
pub mod handle;
pub mod parsing;
pub mod query;
pub mod repository;
pub mod resolver;
pub mod site;
pub mod sitemap;
pub mod types;
pub mod views;
pub mod xml;

#[cfg(test)]
mod test_support;

pub use aggregate::{DateHistogram, TagHistogram, font_size};
pub use content::{ContentItem, ContentKind};
pub use context::{HomeView, Site};
pub use error::*;
pub use freeze::{FreezeReport, clean_output_dir, copy_assets, freeze};
pub use handle::SiteHandle;
pub use parsing::slugify;
pub use query::{PostQuery, QueryMeta, QueryResult};
pub use site::SiteBuilder;
pub use types::*;
pub use views::{Rendered, Route, View};
