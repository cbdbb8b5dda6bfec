//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::i18n::Locale;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode one path segment (slugs may contain non-ASCII text)
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Site-relative path of a news item
pub fn news_path(slug: &str) -> String {
    format!("/news/{}", encode_segment(slug))
}

/// Join a base URL and a site-relative path without doubling slashes
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/news/a") // -> "https://example.com/news/a"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append `lang=<code>` when `locale` is not the site default
///
/// # Examples
/// ```ignore
/// localized("/news/a", Locale::Zh, Locale::En) // -> "/news/a?lang=zh"
/// localized("/news/a", Locale::En, Locale::En) // -> "/news/a"
/// ```
pub fn localized(url: &str, locale: Locale, default: Locale) -> String {
    if locale == default {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}lang={}", url, sep, locale.code())
}

/// Canonical URL of a news item plus the reader-facing link
///
/// The link carries `lang=` when the item's language is a supported,
/// non-default locale; the canonical URL never does.
pub fn news_urls(base: &str, slug: &str, lang: &str, default: Locale) -> (String, String) {
    let canonical = full_url(base, &news_path(slug));
    let link = match Locale::from_code(lang) {
        Some(locale) => localized(&canonical, locale, default),
        None => canonical.clone(),
    };
    (canonical, link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        assert_eq!(
            full_url("https://example.com/", "/news/hello"),
            "https://example.com/news/hello"
        );
        assert_eq!(full_url("https://example.com", "atom.xml"), "https://example.com/atom.xml");
    }

    #[test]
    fn test_news_path_encodes_segment() {
        assert_eq!(news_path("hello-world"), "/news/hello-world");
        assert_eq!(news_path("a b?c"), "/news/a%20b%3Fc");
        assert_eq!(news_path("你好"), "/news/%E4%BD%A0%E5%A5%BD");
    }

    #[test]
    fn test_localized() {
        assert_eq!(localized("/news/a", Locale::Zh, Locale::En), "/news/a?lang=zh");
        assert_eq!(localized("/news/a", Locale::En, Locale::En), "/news/a");
        assert_eq!(
            localized("/api/news?tag=x", Locale::Zh, Locale::En),
            "/api/news?tag=x&lang=zh"
        );
        assert_eq!(localized("/", Locale::En, Locale::Zh), "/?lang=en");
    }

    #[test]
    fn test_news_urls() {
        let (canonical, link) = news_urls("https://x.dev/", "a", "zh", Locale::En);
        assert_eq!(canonical, "https://x.dev/news/a");
        assert_eq!(link, "https://x.dev/news/a?lang=zh");

        let (canonical, link) = news_urls("https://x.dev", "a", "fr", Locale::En);
        assert_eq!(canonical, link);
    }
}
