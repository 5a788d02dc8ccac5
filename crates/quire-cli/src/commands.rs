use crate::NewContentKind;
use axum::{Json, Router};
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use quire_ssg::parsing::parse_content_date;
use quire_ssg::{
    CONFIG_FILE, CONTENTS_DIR, Rendered, Route, SiteBuilder, SiteHandle, clean_output_dir,
    copy_assets, freeze, slugify,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::time::{Duration, Instant};
use tower_http::services::ServeDir;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(300);

fn escape_toml_string(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for character in input.chars() {
        match character {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            control if control < '\u{0020}' => {
                output.push_str(&format!("\\u{:04X}", control as u32));
            }
            other => output.push(other),
        }
    }
    output
}

fn toml_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|value| format!("\"{}\"", escape_toml_string(value.trim())))
        .collect();
    format!("[{}]", quoted.join(", "))
}

pub fn new_site(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let site_dir = Path::new(name);

    if site_dir.exists() {
        return Err(format!("Directory '{name}' already exists").into());
    }

    let contents = site_dir.join(CONTENTS_DIR);
    fs::create_dir_all(contents.join("posts"))?;
    fs::create_dir_all(contents.join("pages"))?;
    fs::create_dir_all(site_dir.join("assets"))?;

    let title = site_dir
        .file_name()
        .map(|file_name| file_name.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let config = format!(
        r#"title = "{}"
base_url = "http://localhost:5000"
description = "A new quire blog"
language = "en"
limit = 10
feed_limit = 10
custom_home_page = ""
"#,
        escape_toml_string(&title)
    );
    fs::write(site_dir.join(CONFIG_FILE), config)?;

    let today = chrono::Local::now().date_naive();
    let post = format!(
        r#"+++
title = "Hello World"
date = {today}
tags = ["welcome"]
+++

This is your first post. Posts need a `title` and a `date` to be listed.

```rust
fn main() {{
    println!("Hello, world!");
}}
```
"#
    );
    fs::write(contents.join("posts").join("hello-world.md"), post)?;

    let about = r#"+++
title = "About"
+++

Pages are reachable by slug and never show up in post listings.
"#;
    fs::write(contents.join("pages").join("about.md"), about)?;

    fs::write(site_dir.join("assets").join("style.css"), "body { margin: 0 auto; }\n")?;

    println!("Created new site: {name}");
    println!("  cd {name}");
    println!("  quire serve");

    Ok(())
}

pub struct NewContent<'a> {
    pub kind: NewContentKind,
    pub title: &'a str,
    pub slug: Option<&'a str>,
    pub date: Option<&'a str>,
    pub tags: &'a [String],
    pub summary: Option<&'a str>,
}

impl<'a> NewContent<'a> {
    pub fn new(kind: NewContentKind, title: &'a str) -> Self {
        Self {
            kind,
            title,
            slug: None,
            date: None,
            tags: &[],
            summary: None,
        }
    }
}

pub fn create_content(
    input: Option<&Path>,
    content: &NewContent<'_>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let input_dir = input.unwrap_or(Path::new("."));
    let slug = content
        .slug
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| slugify(content.title));
    if slug.is_empty() {
        return Err(format!("Title '{}' does not produce a usable slug", content.title).into());
    }

    let directory = match content.kind {
        NewContentKind::Post => "posts",
        NewContentKind::Page => "pages",
    };
    let target = input_dir
        .join(CONTENTS_DIR)
        .join(directory)
        .join(format!("{slug}.md"));
    if target.exists() {
        return Err(format!("{} already exists", target.display()).into());
    }

    let mut frontmatter = format!("title = \"{}\"\n", escape_toml_string(content.title));
    match (content.date.map(str::trim), content.kind) {
        (Some(date), _) => {
            if parse_content_date(date).is_none() {
                return Err(format!("Invalid date '{date}'").into());
            }
            frontmatter.push_str(&format!("date = \"{}\"\n", escape_toml_string(date)));
        }
        (None, NewContentKind::Post) => {
            frontmatter.push_str(&format!("date = {}\n", chrono::Local::now().date_naive()));
        }
        (None, NewContentKind::Page) => {}
    }
    let tags: Vec<String> = content
        .tags
        .iter()
        .filter(|tag| !tag.trim().is_empty())
        .cloned()
        .collect();
    if !tags.is_empty() {
        frontmatter.push_str(&format!("tags = {}\n", toml_list(&tags)));
    }
    if let Some(summary) = content.summary {
        frontmatter.push_str(&format!("summary = \"{}\"\n", escape_toml_string(summary)));
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, format!("+++\n{frontmatter}+++\n\n"))?;

    println!("Created {}", target.display());
    Ok(target)
}

pub fn build_site(
    input: Option<&Path>,
    output: &Path,
    drafts: bool,
    base_url: Option<&str>,
    clean: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = input.unwrap_or(Path::new("."));

    if clean {
        clean_output_dir(output)?;
    }

    tracing::info!(input = %input_dir.display(), "building site");
    let start = Instant::now();

    let mut builder = SiteBuilder::new(input_dir).include_drafts(drafts);
    if let Some(url) = base_url {
        builder = builder.base_url(url);
    }
    let site = builder.build()?;

    let report = freeze(&site, output, chrono::Local::now().date_naive())?;
    copy_assets(&input_dir.join(&site.config.assets), &output.join("assets"))?;

    println!(
        "Built {} routes ({} posts, {} pages) to {} in {:.2?}",
        report.files.len(),
        site.repository().eligible().count(),
        site.repository().pages().count(),
        output.display(),
        start.elapsed()
    );

    Ok(())
}

async fn serve_route(State(handle): State<Arc<SiteHandle>>, uri: Uri) -> Response {
    let Some(route) = Route::parse(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let site = handle.load();
    match site.render(&route) {
        Ok(Rendered::View(view)) => Json(view).into_response(),
        Ok(Rendered::Xml { content_type, body }) => {
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Ok(Rendered::Redirect(location)) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Err(error) if error.is_not_found() => {
            tracing::debug!(path = uri.path(), %error, "not found");
            (StatusCode::NOT_FOUND, error.to_string()).into_response()
        }
        Err(error) => {
            tracing::error!(path = uri.path(), %error, "render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

fn router(handle: Arc<SiteHandle>, assets_dir: &Path) -> Router {
    Router::new()
        .nest_service("/assets", ServeDir::new(assets_dir))
        .fallback(serve_route)
        .with_state(handle)
}

/// The returned watcher must be kept alive for changes to be seen.
fn watch_site(
    input_dir: PathBuf,
    drafts: bool,
    base_url: String,
    handle: Arc<SiteHandle>,
) -> Result<RecommendedWatcher, Box<dyn std::error::Error>> {
    let (notify_tx, notify_rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        notify_tx,
        Config::default().with_poll_interval(Duration::from_millis(200)),
    )?;

    let contents_dir = input_dir.join(CONTENTS_DIR);
    if contents_dir.exists() {
        watcher.watch(&contents_dir, RecursiveMode::Recursive)?;
    }
    let config_path = input_dir.join(CONFIG_FILE);
    if config_path.exists() {
        watcher.watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    std::thread::spawn(move || {
        let builder = SiteBuilder::new(&input_dir)
            .include_drafts(drafts)
            .base_url(base_url);

        loop {
            match notify_rx.recv() {
                Ok(_event) => {
                    loop {
                        match notify_rx.recv_timeout(DEBOUNCE_DURATION) {
                            Ok(_) => continue,
                            Err(RecvTimeoutError::Timeout) => break,
                            Err(RecvTimeoutError::Disconnected) => return,
                        }
                    }

                    tracing::info!("changes detected, reloading");
                    let _ = handle.reload(|| builder.build());
                }
                Err(error) => {
                    tracing::error!(%error, "watch channel closed");
                    break;
                }
            }
        }
    });

    Ok(watcher)
}

pub async fn serve_site(
    input: Option<&Path>,
    drafts: bool,
    host: &str,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = input.unwrap_or(Path::new(".")).to_path_buf();
    let serve_url = format!("http://{host}:{port}");

    let site = SiteBuilder::new(&input_dir)
        .include_drafts(drafts)
        .base_url(serve_url.as_str())
        .build()?;
    let assets_dir = input_dir.join(&site.config.assets);
    let handle = Arc::new(SiteHandle::new(site));

    let _watcher = watch_site(input_dir, drafts, serve_url.clone(), handle.clone())?;

    let app = router(handle, &assets_dir);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(url = %serve_url, "serving, press Ctrl+C to stop");

    if open_browser {
        if let Err(error) = open::that(&serve_url) {
            tracing::warn!(%error, "failed to open browser");
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
