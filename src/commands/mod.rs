//! CLI command implementations

pub mod feed;
pub mod generate;
pub mod list;
pub mod new;

use crate::i18n::{resolve, Locale, LocaleSource};

/// Locale for terminal output: `--lang`, then `$LANG`, then the site default
///
/// `$LANG` values such as `zh_CN.UTF-8` are read like an Accept-Language tag.
pub fn cli_locale(lang: Option<&str>, env_lang: Option<&str>, default: Locale) -> Locale {
    let source = LocaleSource {
        query: lang,
        cookie: None,
        accept_language: env_lang,
    };
    resolve(&source, default)
}

/// Parse a `--lang` filter, rejecting unsupported codes
pub fn lang_filter(lang: Option<&str>) -> anyhow::Result<Option<Locale>> {
    match lang {
        None => Ok(None),
        Some(code) => Locale::from_code(code)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Unsupported language: {}. Available: en, zh", code)),
    }
}
