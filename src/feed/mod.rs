//! RSS 2.0 and Atom 1.0 feeds
//!
//! Both formatters are pure functions of (records, [`FeedMeta`], optional
//! locale filter). An empty item list is a normal input and still produces
//! a complete document with a placeholder subtitle.

mod atom;
mod rss;

pub use atom::format_atom;
pub use rss::format_rss;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;
use crate::content::{ContentLoader, ContentRecord};
use crate::helpers::{encode_segment, full_url, news_urls};
use crate::i18n::{Dictionary, Locale};

/// Content type for the RSS endpoint
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

/// Content type for the Atom endpoint
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml; charset=utf-8";

/// Subtitles used when a feed has no items
#[derive(Debug, Clone)]
pub struct EmptyPlaceholders {
    /// The content directory does not exist
    pub unconfigured: String,
    /// A locale filter removed every item
    pub no_locale_items: String,
    /// The collection itself is empty
    pub no_items: String,
}

impl EmptyPlaceholders {
    pub fn from_dictionary(dict: &Dictionary, locale: Locale) -> Self {
        Self {
            unconfigured: dict.get(locale, "feed.empty.unconfigured"),
            no_locale_items: dict.get(locale, "feed.empty.locale"),
            no_items: dict.get(locale, "feed.empty.all"),
        }
    }
}

/// Static site metadata a feed is built from
#[derive(Debug, Clone)]
pub struct FeedMeta {
    pub title: String,
    /// Canonical site URL; may be empty, in which case ids become URNs
    pub site_url: String,
    pub subtitle: String,
    pub author: String,
    pub generator: String,
    /// Language the feed text is written in
    pub locale: Locale,
    pub default_locale: Locale,
    pub timezone: Tz,
    pub source_configured: bool,
    pub placeholders: EmptyPlaceholders,
    /// Feed-level updated time when there are no items
    pub updated_fallback: DateTime<Utc>,
    /// Maximum number of items, 0 for no limit
    pub limit: usize,
    /// Directory the document is published under, e.g. `zh` for
    /// `zh/atom.xml`; `None` means the served feed at the site root
    pub publish_dir: Option<String>,
}

impl FeedMeta {
    /// Metadata for a feed whose text is in `locale`, built over `loader`
    pub fn from_config(
        config: &SiteConfig,
        dict: &Dictionary,
        locale: Locale,
        loader: &ContentLoader,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title: config.title.clone(),
            site_url: config.base_url().to_string(),
            subtitle: config.feed_subtitle(locale),
            author: config.author.clone(),
            generator: concat!("xdyou-site ", env!("CARGO_PKG_VERSION")).to_string(),
            locale,
            default_locale: config.language,
            timezone: loader.timezone(),
            source_configured: loader.is_configured(),
            placeholders: EmptyPlaceholders::from_dictionary(dict, locale),
            updated_fallback: now,
            limit: config.feed.limit,
            publish_dir: None,
        }
    }

    /// Channel description / feed subtitle for the given outcome
    fn subtitle_for(&self, filter: Option<Locale>, is_empty: bool) -> &str {
        if is_empty {
            if !self.source_configured {
                &self.placeholders.unconfigured
            } else if filter.is_some() {
                &self.placeholders.no_locale_items
            } else {
                &self.placeholders.no_items
            }
        } else if self.subtitle.trim().is_empty() {
            &self.title
        } else {
            &self.subtitle
        }
    }

    /// Absolute URL of a site path, or the bare path without a site URL
    fn url(&self, path: &str) -> String {
        if self.site_url.is_empty() {
            format!("/{}", path.trim_start_matches('/'))
        } else {
            full_url(&self.site_url, path)
        }
    }

    /// URL of the feed document itself
    ///
    /// A published copy links to its own path; the served feed keeps the
    /// locale filter in the query string.
    fn self_url(&self, file: &str, filter: Option<Locale>) -> String {
        if let Some(dir) = &self.publish_dir {
            return self.url(&format!("{}/{}", dir.trim_matches('/'), file));
        }
        let url = self.url(file);
        match filter {
            Some(locale) => format!("{}?lang={}", url, locale.code()),
            None => url,
        }
    }
}

/// A record flattened into what both feed formats need
#[derive(Debug, Clone)]
pub(crate) struct FeedItem<'a> {
    pub title: &'a str,
    /// Stable identifier: canonical URL, or a URN without a site URL
    pub id: String,
    /// Where readers go; falls back to `id`
    pub link: String,
    pub permalink: bool,
    pub date: DateTime<Utc>,
    pub author: &'a str,
    pub tags: &'a [String],
    pub summary: &'a str,
    pub content: &'a str,
}

/// Filter by locale, cap to the limit, and flatten for formatting
pub(crate) fn feed_items<'a>(
    records: &'a [ContentRecord],
    meta: &FeedMeta,
    filter: Option<Locale>,
) -> Vec<FeedItem<'a>> {
    let limit = if meta.limit == 0 { usize::MAX } else { meta.limit };

    records
        .iter()
        .filter(|r| filter.map_or(true, |locale| r.lang == locale.code()))
        .take(limit)
        .map(|record| {
            let (id, link, permalink) = if meta.site_url.is_empty() {
                let urn = format!("urn:xdyou:news:{}", encode_segment(&record.slug));
                (urn.clone(), urn, false)
            } else {
                let (canonical, link) = news_urls(
                    &meta.site_url,
                    &record.slug,
                    &record.lang,
                    meta.default_locale,
                );
                (canonical, link, true)
            };

            FeedItem {
                title: &record.title,
                id,
                link,
                permalink,
                date: record.timestamp(meta.timezone),
                author: &record.author,
                tags: &record.tags,
                summary: &record.excerpt,
                content: &record.rendered_html,
            }
        })
        .collect()
}

/// Newest item date, or the fallback for an empty feed
pub(crate) fn feed_updated(items: &[FeedItem<'_>], meta: &FeedMeta) -> DateTime<Utc> {
    items
        .iter()
        .map(|item| item.date)
        .max()
        .unwrap_or(meta.updated_fallback)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::content::MarkdownRenderer;
    use chrono::TimeZone;
    use std::sync::Arc;

    pub fn meta() -> FeedMeta {
        let config = SiteConfig {
            title: "XDYou".to_string(),
            url: "https://xdyou.example.com/".to_string(),
            description: "Campus helper news".to_string(),
            ..Default::default()
        };
        FeedMeta::from_config(
            &config,
            &Dictionary::builtin(),
            Locale::En,
            &ContentLoader::new(
                env!("CARGO_MANIFEST_DIR"),
                Tz::UTC,
                Arc::new(MarkdownRenderer::new()),
            ),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        )
    }

    pub fn record(slug: &str, title: &str, date: &str, lang: &str) -> ContentRecord {
        ContentRecord {
            slug: slug.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            author: "BenderBlog".to_string(),
            tags: vec!["release".to_string()],
            lang: lang.to_string(),
            body: "Body text".to_string(),
            rendered_html: String::new(),
            excerpt: "Body text...".to_string(),
        }
    }

    /// All text below a node, with CDATA sections merged
    pub fn text_of(node: roxmltree::Node<'_, '_>) -> String {
        node.descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect()
    }

    pub fn child<'a, 'input>(
        node: roxmltree::Node<'a, 'input>,
        name: &str,
    ) -> Option<roxmltree::Node<'a, 'input>> {
        node.children().find(|n| n.tag_name().name() == name)
    }
}
