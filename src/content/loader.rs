//! Content loader - reads Markdown records from the content directory
//!
//! Nothing is cached: every call re-reads the directory, so the loader can
//! be shared freely between concurrent requests.

use anyhow::Result;
use chrono_tz::Tz;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::excerpt::excerpt;
use super::record::{DEFAULT_AUTHOR, DEFAULT_LANG, DEFAULT_TITLE};
use super::{ContentRecord, FrontMatter, MarkdownRenderer};

/// In file-name order, so a slug lookup picks the same file the listing keeps
const EXTENSIONS: [&str; 2] = ["markdown", "md"];

/// Loads content records from one directory of Markdown files
#[derive(Clone)]
pub struct ContentLoader {
    dir: PathBuf,
    timezone: Tz,
    renderer: Arc<MarkdownRenderer>,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: Into<PathBuf>>(dir: P, timezone: Tz, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            dir: dir.into(),
            timezone,
            renderer,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Whether the content directory exists at all
    pub fn is_configured(&self) -> bool {
        self.dir.is_dir()
    }

    /// All records, newest first, without rendered HTML
    ///
    /// A missing directory yields an empty list. Files that fail to read or
    /// parse are logged and skipped.
    pub fn list_all(&self) -> Vec<ContentRecord> {
        if !self.dir.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.dir);
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            let Some(slug) = slug_of(path) else {
                continue;
            };
            if seen.contains(&slug) {
                tracing::warn!("Skipping {:?}: slug {:?} is already taken", path, slug);
                continue;
            }

            match self.load_record(path, slug.clone()) {
                Ok(record) => {
                    seen.insert(slug);
                    records.push(record);
                }
                Err(e) => tracing::warn!("Failed to load content {:?}: {}", path, e),
            }
        }

        // Newest first; undated records go last, and the sort is stable so
        // equal dates keep file-name order
        let tz = self.timezone;
        records.sort_by_cached_key(|r| std::cmp::Reverse(r.parsed_date(tz)));

        records
    }

    /// One record with its body rendered, or `None` if there is no such
    /// slug or the file cannot be parsed
    pub fn get_by_slug(&self, slug: &str) -> Option<ContentRecord> {
        if !is_safe_slug(slug) {
            return None;
        }

        // First parseable file wins, same as the listing
        let mut record = EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", slug, ext)))
            .filter(|p| p.is_file())
            .find_map(|path| match self.load_record(&path, slug.to_string()) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Failed to load content {:?}: {}", path, e);
                    None
                }
            })?;

        record.rendered_html = self.renderer.render(&record.body);
        Some(record)
    }

    /// Read one file into a record (`rendered_html` left empty)
    fn load_record(&self, path: &Path, slug: String) -> Result<ContentRecord> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        Ok(ContentRecord {
            slug,
            title: non_empty(fm.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: fm.date.unwrap_or_default(),
            author: non_empty(fm.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            tags: fm.tags,
            lang: non_empty(fm.lang).unwrap_or_else(|| DEFAULT_LANG.to_string()),
            excerpt: excerpt(body),
            body: body.to_string(),
            rendered_html: String::new(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn slug_of(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Slugs come from URLs; refuse anything that could leave the directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.contains(['/', '\\', '\0'])
        && slug != "."
        && !slug.contains("..")
}
