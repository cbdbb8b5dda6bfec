//! Content record model

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::helpers::{date_or_epoch, parse_date};
use crate::i18n::Locale;

/// Title used when front-matter has none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Author used when front-matter has none
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// Language code used when front-matter has none
pub const DEFAULT_LANG: &str = "en";

/// One Markdown file, normalized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// File name without extension; unique within a collection
    pub slug: String,

    pub title: String,

    /// Date string as written in front-matter, possibly empty
    pub date: String,

    pub author: String,

    pub tags: Vec<String>,

    /// Locale code, e.g. `en` or `zh`
    pub lang: String,

    /// Raw Markdown after the front-matter block
    pub body: String,

    /// Rendered body; only filled by single-item lookups
    pub rendered_html: String,

    pub excerpt: String,
}

impl ContentRecord {
    /// Parsed `date`, `None` when it is empty or unparseable
    ///
    /// `None` orders below every real date.
    pub fn parsed_date(&self, tz: Tz) -> Option<DateTime<Utc>> {
        parse_date(&self.date, tz)
    }

    /// Parsed `date`, or the Unix epoch when it is empty or unparseable
    pub fn timestamp(&self, tz: Tz) -> DateTime<Utc> {
        date_or_epoch(&self.date, tz)
    }

    /// Listing projection with an absolute URL and no body
    pub fn summary(&self, url: String) -> RecordSummary<'_> {
        RecordSummary {
            slug: &self.slug,
            title: &self.title,
            date: &self.date,
            author: &self.author,
            tags: &self.tags,
            lang: &self.lang,
            excerpt: &self.excerpt,
            url,
        }
    }
}

/// What the JSON listing exposes for each record
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    pub author: &'a str,
    pub tags: &'a [String],
    pub lang: &'a str,
    pub excerpt: &'a str,
    pub url: String,
}

/// Body of the news listing, served by the API and written by `generate`
#[derive(Debug, Clone, Serialize)]
pub struct NewsListing<'a> {
    pub posts: Vec<RecordSummary<'a>>,
    pub total: usize,
    pub lang: Locale,
}

impl<'a> NewsListing<'a> {
    pub fn new(posts: Vec<RecordSummary<'a>>, lang: Locale) -> Self {
        Self {
            total: posts.len(),
            posts,
            lang,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> ContentRecord {
        ContentRecord {
            slug: "a".to_string(),
            title: DEFAULT_TITLE.to_string(),
            date: date.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            tags: vec!["x".to_string()],
            lang: DEFAULT_LANG.to_string(),
            body: "body".to_string(),
            rendered_html: String::new(),
            excerpt: "body...".to_string(),
        }
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(
            record("2024-01-15").timestamp(Tz::UTC).to_rfc3339(),
            "2024-01-15T00:00:00+00:00"
        );
        assert_eq!(record("").timestamp(Tz::UTC), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_summary_omits_body() {
        let rec = record("2024-01-15");
        let json = serde_json::to_value(rec.summary("https://x/news/a".to_string())).unwrap();
        assert_eq!(json["url"], "https://x/news/a");
        assert_eq!(json["tags"][0], "x");
        assert!(json.get("body").is_none());
        assert!(json.get("rendered_html").is_none());
    }
}
