//! Site configuration (_config.yml)

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::helpers::news_urls;
use crate::i18n::Locale;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: Locale,
    pub timezone: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub i18n_dir: String,

    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub bangumi: BangumiConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "XDYou".to_string(),
            description: String::new(),
            author: "XDYou Team".to_string(),
            language: Locale::En,
            timezone: "UTC".to_string(),

            url: "http://localhost:4000".to_string(),

            content_dir: "content/news".to_string(),
            public_dir: "public".to_string(),
            i18n_dir: "i18n".to_string(),

            markdown: MarkdownConfig::default(),
            feed: FeedConfig::default(),
            github: GithubConfig::default(),
            bangumi: BangumiConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Pick up secrets that should not live in `_config.yml`
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                self.github.token = Some(token.trim().to_string());
            }
        }
    }

    /// Resolve the configured timezone, falling back to UTC
    ///
    /// Logs a warning on every unknown zone; [`crate::Site`] calls this once
    /// and keeps the result.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                Tz::UTC
            }
        }
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Reader-facing absolute URL of a news item
    pub fn news_link(&self, slug: &str, lang: &str) -> String {
        news_urls(self.base_url(), slug, lang, self.language).1
    }

    /// Feed subtitle for a locale, falling back to the site description
    pub fn feed_subtitle(&self, locale: Locale) -> String {
        self.feed
            .subtitle
            .get(locale.code())
            .cloned()
            .unwrap_or_else(|| self.description.clone())
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub highlight_theme: String,
    pub line_number: bool,
    /// Pass raw HTML in Markdown through instead of escaping it
    pub allow_html: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: "base16-ocean.dark".to_string(),
            line_number: false,
            allow_html: false,
        }
    }
}

/// RSS / Atom feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of items per feed (0 = unlimited)
    pub limit: usize,
    /// Shared cache freshness, in seconds
    pub revalidate: u64,
    /// Window during which a stale feed may be served while revalidating
    pub stale: u64,
    /// Per-locale subtitle, keyed by locale code
    #[serde(default)]
    pub subtitle: HashMap<String, String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: 0,
            revalidate: 3600,
            stale: 86400,
            subtitle: HashMap::new(),
        }
    }
}

/// GitHub repository the release and contributor data comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    pub api_base: String,
    pub per_page: u32,
    pub revalidate: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: "BenderBlog".to_string(),
            repo: "traintime_pda".to_string(),
            token: None,
            api_base: "https://api.github.com".to_string(),
            per_page: 30,
            revalidate: 3600,
        }
    }
}

impl GithubConfig {
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }
}

/// Bangumi (bgm.tv) collection source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BangumiConfig {
    pub username: String,
    pub api_base: String,
    /// 2 = anime
    pub subject_type: u8,
    /// 1 wish, 2 done, 3 doing, 4 on hold, 5 dropped
    pub collection_type: u8,
    pub limit: u32,
    pub revalidate: u64,
}

impl Default for BangumiConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            api_base: "https://api.bgm.tv".to_string(),
            subject_type: 2,
            collection_type: 2,
            limit: 30,
            revalidate: 3600,
        }
    }
}

impl BangumiConfig {
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 8,
            user_agent: concat!("xdyou-site/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
