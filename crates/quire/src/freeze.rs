use crate::context::Site;
use crate::error::{IoContext, QuireError, Result};
use crate::views::{Rendered, Route};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const VIEW_FILE: &str = "index.json";

#[derive(Debug, Default)]
pub struct FreezeReport {
    pub routes: usize,
    pub files: Vec<PathBuf>,
    pub skipped: Vec<String>,
}

pub fn freeze(site: &Site, output_dir: &Path, today: NaiveDate) -> Result<FreezeReport> {
    fs::create_dir_all(output_dir).io_context("creating output directory", output_dir)?;

    let routes = site.routes()?;
    let mut report = FreezeReport {
        routes: routes.len(),
        ..FreezeReport::default()
    };

    // Built-in routes come before content, so they keep their paths.
    let mut claimed: HashMap<PathBuf, &Route> = HashMap::with_capacity(routes.len());
    let mut planned: Vec<(&Route, PathBuf)> = Vec::with_capacity(routes.len());
    for route in &routes {
        let url = route.url();
        let Some(target) = output_path(output_dir, &url) else {
            tracing::warn!(%url, "refusing to write outside the output directory");
            report.skipped.push(url);
            continue;
        };
        if let Some(owner) = claimed.get(&target) {
            tracing::warn!(%url, shadowed_by = ?owner, "route output is already taken");
            report.skipped.push(url);
            continue;
        }
        claimed.insert(target.clone(), route);
        planned.push((route, target));
    }

    let written: Vec<Option<PathBuf>> = planned
        .par_iter()
        .map(|(route, target)| write_route(site, route, target, today))
        .collect::<Result<_>>()?;

    for ((route, _), file) in planned.iter().zip(written) {
        match file {
            Some(file) => report.files.push(file),
            None => report.skipped.push(route.url()),
        }
    }

    tracing::info!(
        routes = report.routes,
        files = report.files.len(),
        skipped = report.skipped.len(),
        output = %output_dir.display(),
        "site frozen"
    );

    Ok(report)
}

fn write_route(
    site: &Site,
    route: &Route,
    target: &Path,
    today: NaiveDate,
) -> Result<Option<PathBuf>> {
    let contents = match site.render_at(route, today)? {
        Rendered::View(view) => serde_json::to_string_pretty(&view)?,
        Rendered::Xml { body, .. } => body,
        Rendered::Redirect(location) => {
            tracing::debug!(url = %route.url(), %location, "not freezing redirect");
            return Ok(None);
        }
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).io_context("creating directory", parent)?;
    }
    fs::write(target, contents).io_context("writing", target)?;
    tracing::debug!(url = %route.url(), path = %target.display(), "wrote route");

    Ok(Some(target.to_path_buf()))
}

/// Maps a route URL onto the output tree. Directory URLs get an
/// `index.json`; anything that could escape `output_dir` maps to `None`.
fn output_path(output_dir: &Path, url: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(url).ok()?;
    let relative = decoded.trim_start_matches('/');

    if !is_safe_output_path(relative) {
        return None;
    }

    let mut target = output_dir.join(relative.trim_end_matches('/'));
    if relative.is_empty() || relative.ends_with('/') {
        target.push(VIEW_FILE);
    }
    Some(target)
}

fn is_safe_output_path(relative: &str) -> bool {
    if relative.starts_with('\\') || relative.contains(':') || Path::new(relative).is_absolute() {
        return false;
    }
    if relative.bytes().any(|byte| byte < 0x20) {
        return false;
    }
    relative
        .split(['/', '\\'])
        .all(|segment| segment != ".." && segment != ".")
}

pub fn clean_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir).io_context("removing", output_dir)?;
    }
    Ok(())
}

pub fn copy_assets(source: &Path, destination: &Path) -> Result<usize> {
    if !source.is_dir() {
        tracing::debug!(path = %source.display(), "no assets to copy");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|error| QuireError::WalkDir {
            path: source.to_path_buf(),
            message: error.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| QuireError::InvalidPath {
                path: entry.path().to_path_buf(),
            })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).io_context("creating directory", &target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).io_context("creating directory", parent)?;
            }
            fs::copy(entry.path(), &target).io_context("copying asset", entry.path())?;
            copied += 1;
        }
    }

    tracing::info!(files = copied, "assets copied");
    Ok(copied)
}
