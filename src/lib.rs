//! xdyou-site: content, feed and data service for the XDYou website
//!
//! Reads Markdown news items with YAML front-matter, renders them to HTML,
//! and serves them as JSON, RSS 2.0 and Atom 1.0 alongside a few proxied
//! upstream data sources.

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod i18n;
pub mod server;
pub mod sources;

use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentLoader, MarkdownRenderer};
use feed::FeedMeta;
use i18n::{Dictionary, Locale};

/// A site rooted at one directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown content directory
    pub content_dir: PathBuf,
    /// Static files and generated output
    pub public_dir: PathBuf,
    /// Translation overrides
    pub i18n_dir: PathBuf,
    /// Resolved site timezone
    pub tz: Tz,
}

impl Site {
    /// Open the site in `base_dir`, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let i18n_dir = base_dir.join(&config.i18n_dir);
        let tz = config.tz();

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            i18n_dir,
            tz,
        }
    }

    /// Content loader with a freshly built renderer
    pub fn loader(&self) -> ContentLoader {
        let renderer = Arc::new(MarkdownRenderer::from_config(&self.config.markdown));
        ContentLoader::new(&self.content_dir, self.tz, renderer)
    }

    /// Built-in strings merged with the site's overrides
    pub fn dictionary(&self) -> Result<Dictionary> {
        Dictionary::load(&self.i18n_dir)
    }

    /// Feed metadata for text in `locale`, stamped with the current time
    pub fn feed_meta(&self, dict: &Dictionary, locale: Locale, loader: &ContentLoader) -> FeedMeta {
        FeedMeta::from_config(&self.config, dict, locale, loader, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_site_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_dir, dir.path().join("content/news"));
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert!(!site.loader().is_configured());
    }

    #[test]
    fn test_site_reads_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("_config.yml"),
            "title: Campus\ncontent_dir: posts\nlanguage: zh\nfeed:\n  limit: 5\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Campus");
        assert_eq!(site.config.language, Locale::Zh);
        assert_eq!(site.config.feed.limit, 5);
        assert_eq!(site.content_dir, dir.path().join("posts"));
    }

    #[test]
    fn test_timezone_resolved_once() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "timezone: Asia/Shanghai
").unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.tz, chrono_tz::Asia::Shanghai);
        assert_eq!(site.loader().timezone(), chrono_tz::Asia::Shanghai);

        let config = config::SiteConfig {
            timezone: "Nowhere/Special".to_string(),
            ..Default::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);
        assert_eq!(site.tz, Tz::UTC);
        assert_eq!(site.loader().timezone(), Tz::UTC);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("_config.yml"), "title: [unclosed\n").unwrap();
        assert!(Site::new(dir.path()).is_err());
    }
}
