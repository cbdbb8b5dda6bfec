//! Write feeds and the news listing into the public directory
//!
//! The output lets a plain static host serve the same documents the
//! server would: `rss.xml`, `atom.xml`, per-locale `<lang>/rss.xml` and
//! `<lang>/atom.xml`, and `api/news.json`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::feed::FeedFormat;
use crate::content::{NewsListing, RecordSummary};
use crate::feed::{format_atom, format_rss};
use crate::i18n::Locale;
use crate::Site;

/// Generate all static outputs, returning the files written
pub fn run(site: &Site) -> Result<Vec<PathBuf>> {
    let start = std::time::Instant::now();

    let loader = site.loader();
    let dict = site.dictionary()?;
    let records = loader.list_all();
    tracing::info!("Loaded {} news items from {:?}", records.len(), loader.dir());

    let public_dir = &site.public_dir;
    fs::create_dir_all(public_dir)?;
    let mut written = Vec::new();

    let default = site.config.language;
    let meta = site.feed_meta(&dict, default, &loader);
    written.push(write_file(public_dir, FeedFormat::Rss.file_name(), &format_rss(&records, &meta, None))?);
    written.push(write_file(public_dir, FeedFormat::Atom.file_name(), &format_atom(&records, &meta, None))?);

    for locale in Locale::ALL {
        let mut meta = site.feed_meta(&dict, locale, &loader);
        meta.publish_dir = Some(locale.code().to_string());
        let dir = public_dir.join(locale.code());
        written.push(write_file(&dir, FeedFormat::Rss.file_name(), &format_rss(&records, &meta, Some(locale)))?);
        written.push(write_file(&dir, FeedFormat::Atom.file_name(), &format_atom(&records, &meta, Some(locale)))?);
    }

    let posts: Vec<RecordSummary> = records
        .iter()
        .map(|r| r.summary(site.config.news_link(&r.slug, &r.lang)))
        .collect();
    let listing = serde_json::to_string_pretty(&NewsListing::new(posts, default))?;
    written.push(write_file(&public_dir.join("api"), "news.json", &listing)?);

    for path in &written {
        tracing::debug!("Generated: {:?}", path);
    }
    tracing::info!(
        "Generated {} files in {:.2}s",
        written.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(written)
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}
