//! Atom 1.0 formatter

use super::{feed_items, feed_updated, FeedMeta};
use crate::content::ContentRecord;
use crate::helpers::{date_xml, escape_xml};
use crate::i18n::Locale;

/// Render `records` (already sorted newest first) as an Atom document
pub fn format_atom(records: &[ContentRecord], meta: &FeedMeta, filter: Option<Locale>) -> String {
    let items = feed_items(records, meta, filter);
    let subtitle = meta.subtitle_for(filter, items.is_empty());
    let language = filter.unwrap_or(meta.locale);
    let feed_id = if meta.site_url.is_empty() {
        "urn:xdyou:feed".to_string()
    } else {
        meta.url("/")
    };

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(&format!(
        "<feed xmlns=\"http://www.w3.org/2005/Atom\" xml:lang=\"{}\">\n",
        language.html_lang()
    ));
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&meta.title)));
    feed.push_str(&format!("  <subtitle>{}</subtitle>\n", escape_xml(subtitle)));
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\" type=\"application/atom+xml\"/>\n",
        escape_xml(&meta.self_url("atom.xml", filter))
    ));
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"alternate\" type=\"text/html\"/>\n",
        escape_xml(&meta.url("/"))
    ));
    feed.push_str(&format!("  <id>{}</id>\n", escape_xml(&feed_id)));
    feed.push_str(&format!(
        "  <updated>{}</updated>\n",
        date_xml(&feed_updated(&items, meta))
    ));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&meta.author)
    ));
    feed.push_str(&format!("  <generator>{}</generator>\n", escape_xml(&meta.generator)));

    for item in &items {
        // Published and updated are the same: records carry a single date
        let date = date_xml(&item.date);
        feed.push_str(&format!("  <entry><id>{}</id>\n", escape_xml(&item.id)));
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(item.title)));
        feed.push_str(&format!(
            "    <link href=\"{}\" rel=\"alternate\" type=\"text/html\"/>\n",
            escape_xml(&item.link)
        ));
        feed.push_str(&format!("    <published>{}</published>\n", date));
        feed.push_str(&format!("    <updated>{}</updated>\n", date));
        feed.push_str(&format!(
            "    <author><name>{}</name></author>\n",
            escape_xml(item.author)
        ));
        for tag in item.tags {
            feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(tag)));
        }
        if !item.summary.is_empty() {
            feed.push_str(&format!(
                "    <summary type=\"text\">{}</summary>\n",
                escape_xml(item.summary)
            ));
        }
        if !item.content.is_empty() {
            feed.push_str(&format!(
                "    <content type=\"html\">{}</content>\n",
                escape_xml(item.content)
            ));
        }
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}
