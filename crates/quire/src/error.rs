use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error while {action} {path}: {source}")]
    IoAt {
        action: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {message}")]
    TomlParse { path: PathBuf, message: String },

    #[error("YAML parse error in {path}: {message}")]
    YamlParse { path: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid frontmatter in file: {path}")]
    InvalidFrontmatter { path: PathBuf },

    #[error("Invalid date '{value}' in file: {path}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Directory walk error in {path}: {message}")]
    WalkDir { path: PathBuf, message: String },

    #[error("Duplicate slug '{slug}' in {path} conflicts with {existing_path}")]
    DuplicateSlug {
        slug: String,
        path: String,
        existing_path: String,
    },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Custom home page '{slug}' not found in pages or posts")]
    HomePageNotFound { slug: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl QuireError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, QuireError>;

pub trait IoContext<T> {
    fn io_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|source| QuireError::IoAt {
            action: action.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}
