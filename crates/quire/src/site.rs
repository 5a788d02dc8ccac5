use crate::content::{ContentItem, RawContent};
use crate::context::Site;
use crate::error::{IoContext, QuireError, Result};
use crate::parsing::{MarkdownRenderer, extract_frontmatter};
use crate::types::{CONFIG_FILE, CONTENT_EXTENSION, CONTENTS_DIR, SiteConfig};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct SiteBuilder {
    input_dir: PathBuf,
    include_drafts: bool,
    base_url_override: Option<String>,
    renderer: MarkdownRenderer,
}

impl SiteBuilder {
    pub fn new(input_dir: impl AsRef<Path>) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            include_drafts: false,
            base_url_override: None,
            renderer: MarkdownRenderer::new(),
        }
    }

    pub fn include_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn build(&self) -> Result<Site> {
        let mut config = self.load_config()?;

        if let Some(ref url) = self.base_url_override {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        let mut items = Vec::new();
        for raw in self.load_contents()? {
            let path = raw.path.clone();
            match ContentItem::from_raw(raw, config.summary_offset)? {
                Some(item) => items.push(item),
                None => tracing::debug!(%path, "skipping file outside posts/ and pages/"),
            }
        }

        Site::new(config, items)
    }

    pub fn load_config(&self) -> Result<SiteConfig> {
        let config_path = self.input_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(QuireError::ConfigNotFound { path: config_path });
        }

        let content =
            fs::read_to_string(&config_path).io_context("reading config", &config_path)?;
        let mut config: SiteConfig =
            toml::from_str(&content).map_err(|error| QuireError::TomlParse {
                path: config_path.clone(),
                message: error.to_string(),
            })?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }

    pub fn load_contents(&self) -> Result<Vec<RawContent>> {
        let contents_dir = self.input_dir.join(CONTENTS_DIR);
        let mut contents = Vec::new();

        if !contents_dir.exists() {
            tracing::warn!(path = %contents_dir.display(), "contents directory is missing");
            return Ok(contents);
        }

        for entry in WalkDir::new(&contents_dir)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|error| QuireError::WalkDir {
                path: contents_dir.clone(),
                message: error.to_string(),
            })?;

            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }

            if path
                .extension()
                .map(|extension| extension != CONTENT_EXTENSION)
                .unwrap_or(true)
            {
                continue;
            }

            if entry.file_name().to_string_lossy().starts_with('_') {
                continue;
            }

            let relative = path
                .strip_prefix(&contents_dir)
                .map_err(|_| QuireError::InvalidPath {
                    path: path.to_path_buf(),
                })?;

            let raw = self.parse_file(path, relative)?;

            if raw.frontmatter.get_bool("draft").unwrap_or(false) && !self.include_drafts {
                tracing::debug!(path = %raw.path, "skipping draft");
                continue;
            }

            contents.push(raw);
        }

        Ok(contents)
    }

    fn parse_file(&self, path: &Path, relative: &Path) -> Result<RawContent> {
        let file_content = fs::read_to_string(path).io_context("reading content", path)?;
        let (frontmatter, source) = extract_frontmatter(&file_content, path)?;
        let body = self.renderer.render(&source);

        Ok(RawContent {
            path: content_path(relative),
            frontmatter,
            source,
            body,
        })
    }
}

/// `posts/2015/hello.md` becomes `posts/2015/hello`, always `/`-separated.
fn content_path(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
