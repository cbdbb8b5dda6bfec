//! Render a feed to a string

use anyhow::Result;
use clap::ValueEnum;

use crate::feed::{format_atom, format_rss};
use crate::i18n::Locale;
use crate::Site;

/// Feed document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            FeedFormat::Rss => "rss.xml",
            FeedFormat::Atom => "atom.xml",
        }
    }
}

/// Build a feed document; `locale` picks the text, `filter` the items
pub fn render(
    site: &Site,
    format: FeedFormat,
    locale: Locale,
    filter: Option<Locale>,
) -> Result<String> {
    let loader = site.loader();
    let dict = site.dictionary()?;
    let records = loader.list_all();
    let meta = site.feed_meta(&dict, filter.unwrap_or(locale), &loader);

    Ok(match format {
        FeedFormat::Rss => format_rss(&records, &meta, filter),
        FeedFormat::Atom => format_atom(&records, &meta, filter),
    })
}
