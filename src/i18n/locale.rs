//! Locale selection
//!
//! Every caller (request extractor, page handler, CLI) builds a
//! [`LocaleSource`] from whatever it has and hands it to [`resolve`], so the
//! priority chain lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the cookie that remembers a visitor's language choice
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// Supported site languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];

    /// Parse a locale code; anything unsupported is `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }

    /// Short code used in URLs, cookies and front-matter
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    /// Language tag for `<html lang>` and feed `<language>` elements
    pub fn html_lang(self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Zh => "zh-CN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw locale hints available to a caller. All fields are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleSource<'a> {
    /// `lang` query parameter
    pub query: Option<&'a str>,
    /// `NEXT_LOCALE` cookie value
    pub cookie: Option<&'a str>,
    /// `Accept-Language` header (or an equivalent such as `$LANG`)
    pub accept_language: Option<&'a str>,
}

/// Resolve the locale: query, then cookie, then the first Accept-Language
/// tag, then `default`. Unsupported values at any level are skipped.
pub fn resolve(source: &LocaleSource<'_>, default: Locale) -> Locale {
    source
        .query
        .and_then(Locale::from_code)
        .or_else(|| source.cookie.and_then(Locale::from_code))
        .or_else(|| source.accept_language.and_then(primary_language))
        .unwrap_or(default)
}

/// Primary subtag of the first language tag in an Accept-Language value
///
/// `"zh-CN,zh;q=0.9,en;q=0.8"` -> `zh`. Only the first tag is considered.
pub fn primary_language(header: &str) -> Option<Locale> {
    let first = header.split(',').next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split(['-', '_', '.']).next()?;
    Locale::from_code(primary)
}

/// Extract a cookie value from a raw `Cookie` header
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() == name {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}
