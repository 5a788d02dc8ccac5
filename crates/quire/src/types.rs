use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const CONFIG_FILE: &str = "quire.toml";
pub const CONTENTS_DIR: &str = "_contents";
pub const CONTENT_EXTENSION: &str = "md";

const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub base_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub custom_home_page: Option<String>,
    #[serde(default = "default_summary_offset")]
    pub summary_offset: usize,
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,
    #[serde(default = "default_assets_dir")]
    pub assets: String,
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

pub fn default_limit() -> usize {
    10
}

pub fn default_summary_offset() -> usize {
    180
}

pub fn default_feed_limit() -> usize {
    10
}

pub fn default_assets_dir() -> String {
    "assets".to_string()
}

impl SiteConfig {
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            description: None,
            author: None,
            language: None,
            limit: default_limit(),
            custom_home_page: None,
            summary_offset: default_summary_offset(),
            feed_limit: default_feed_limit(),
            assets: default_assets_dir(),
            extra: HashMap::new(),
        }
    }

    pub fn home_page_slug(&self) -> Option<&str> {
        self.custom_home_page
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
    }

    pub fn page_limit(&self) -> usize {
        if self.limit == 0 {
            default_limit()
        } else {
            self.limit
        }
    }

    pub fn absolute_url(&self, url: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(flatten)]
    pub raw: HashMap<String, Value>,
}

impl Frontmatter {
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.raw
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.raw.get(key).and_then(|value| value.as_bool())
    }

    /// Reads either an array of strings or a comma separated string.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        let value = self.raw.get(key)?;
        let items: Vec<String> = match value {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| entry.as_str())
                .map(|entry| entry.trim().to_string())
                .collect(),
            Value::String(joined) => joined
                .split(',')
                .map(|entry| entry.trim().to_string())
                .collect(),
            _ => return None,
        };
        Some(items.into_iter().filter(|entry| !entry.is_empty()).collect())
    }

    pub fn get_date_string(&self, key: &str) -> Option<String> {
        match self.raw.get(key)? {
            Value::String(text) => Some(text.trim().to_string()),
            Value::Object(map) => map
                .get(TOML_DATETIME_FIELD)
                .and_then(|inner| inner.as_str())
                .map(String::from),
            _ => None,
        }
        .filter(|text| !text.is_empty())
    }
}
