//! RSS 2.0 formatter
//!
//! Free text goes into CDATA sections; URLs are entity-escaped.

use super::{feed_items, feed_updated, FeedMeta};
use crate::content::ContentRecord;
use crate::helpers::{cdata, date_rfc2822, escape_xml};
use crate::i18n::Locale;

/// Render `records` (already sorted newest first) as an RSS 2.0 document
pub fn format_rss(records: &[ContentRecord], meta: &FeedMeta, filter: Option<Locale>) -> String {
    let items = feed_items(records, meta, filter);
    let description = meta.subtitle_for(filter, items.is_empty());
    let language = filter.unwrap_or(meta.locale);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(
        r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#,
    );
    feed.push_str("\n  <channel>\n");
    feed.push_str(&format!("    <title>{}</title>\n", cdata(&meta.title)));
    feed.push_str(&format!("    <link>{}</link>\n", escape_xml(&meta.url("/"))));
    feed.push_str(&format!("    <description>{}</description>\n", cdata(description)));
    feed.push_str(&format!("    <language>{}</language>\n", language.html_lang()));
    feed.push_str(&format!("    <generator>{}</generator>\n", escape_xml(&meta.generator)));
    feed.push_str(&format!(
        "    <lastBuildDate>{}</lastBuildDate>\n",
        date_rfc2822(&feed_updated(&items, meta))
    ));
    feed.push_str(&format!(
        "    <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&meta.self_url("rss.xml", filter))
    ));

    for item in &items {
        feed.push_str("    <item>\n");
        feed.push_str(&format!("      <title>{}</title>\n", cdata(item.title)));
        feed.push_str(&format!("      <link>{}</link>\n", escape_xml(&item.link)));
        feed.push_str(&format!(
            "      <guid isPermaLink=\"{}\">{}</guid>\n",
            item.permalink,
            escape_xml(&item.id)
        ));
        feed.push_str(&format!("      <pubDate>{}</pubDate>\n", date_rfc2822(&item.date)));
        feed.push_str(&format!("      <dc:creator>{}</dc:creator>\n", cdata(item.author)));
        for tag in item.tags {
            feed.push_str(&format!("      <category>{}</category>\n", cdata(tag)));
        }
        feed.push_str(&format!("      <description>{}</description>\n", cdata(item.summary)));
        if !item.content.is_empty() {
            feed.push_str(&format!(
                "      <content:encoded>{}</content:encoded>\n",
                cdata(item.content)
            ));
        }
        feed.push_str("    </item>\n");
    }

    feed.push_str("  </channel>\n</rss>\n");
    feed
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn items_of<'a>(doc: &'a roxmltree::Document<'a>) -> Vec<roxmltree::Node<'a, 'a>> {
        doc.descendants()
            .filter(|n| n.tag_name().name() == "item")
            .collect()
    }

    #[test]
    fn test_one_item_per_record() {
        let records = vec![
            record("a", "A", "2024-03-01", "en"),
            record("b", "B", "2024-02-01", "zh"),
        ];
        let xml = format_rss(&records, &meta(), None);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let items = items_of(&doc);
        assert_eq!(items.len(), 2);

        let first = items[0];
        assert_eq!(text_of(child(first, "title").unwrap()), "A");
        assert_eq!(
            text_of(child(first, "link").unwrap()),
            "https://xdyou.example.com/news/a"
        );
        assert_eq!(
            text_of(child(first, "pubDate").unwrap()),
            "Fri, 01 Mar 2024 00:00:00 GMT"
        );
        assert_eq!(text_of(child(first, "category").unwrap()), "release");
        assert_eq!(
            text_of(child(items[1], "link").unwrap()),
            "https://xdyou.example.com/news/b?lang=zh"
        );

        let channel = doc
            .descendants()
            .find(|n| n.tag_name().name() == "channel")
            .unwrap();
        assert_eq!(
            text_of(child(channel, "lastBuildDate").unwrap()),
            "Fri, 01 Mar 2024 00:00:00 GMT"
        );
    }

    #[test]
    fn test_default_meta_keeps_every_record() {
        let records: Vec<_> = (0..25)
            .map(|i| {
                let day = format!("2024-01-{:02}", 25 - i);
                record(&format!("n{}", i), "N", &day, "en")
            })
            .collect();
        let xml = format_rss(&records, &meta(), None);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(items_of(&doc).len(), records.len());
    }

    #[test]
    fn test_empty_feed_is_valid() {
        let xml = format_rss(&[], &meta(), None);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(items_of(&doc).is_empty());

        let channel = doc
            .descendants()
            .find(|n| n.tag_name().name() == "channel")
            .unwrap();
        let description = text_of(child(channel, "description").unwrap());
        assert!(!description.is_empty());
        assert_eq!(description, meta().placeholders.no_items);
        assert_eq!(
            text_of(child(channel, "lastBuildDate").unwrap()),
            "Sun, 01 Jun 2025 00:00:00 GMT"
        );
    }

    #[test]
    fn test_locale_filter_to_nothing() {
        let records = vec![record("a", "A", "2024-03-01", "en")];
        let mut meta = meta();
        meta.placeholders = super::super::EmptyPlaceholders::from_dictionary(
            &crate::i18n::Dictionary::builtin(),
            Locale::Zh,
        );
        let xml = format_rss(&records, &meta, Some(Locale::Zh));
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert!(items_of(&doc).is_empty());
        let channel = doc
            .descendants()
            .find(|n| n.tag_name().name() == "channel")
            .unwrap();
        assert_eq!(
            text_of(child(channel, "description").unwrap()),
            "此订阅源暂无中文文章。"
        );
        assert_eq!(text_of(child(channel, "language").unwrap()), "zh-CN");
        assert!(xml.contains("rss.xml?lang=zh"));
    }

    #[test]
    fn test_special_characters_round_trip() {
        let mut rec = record("x", "A & B <C>", "2024-01-01", "en");
        rec.excerpt = "Ends with ]]> inside & <tags>...".to_string();
        rec.author = "O'Neil \"Dev\"".to_string();
        let xml = format_rss(&[rec], &meta(), None);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let item = items_of(&doc)[0];
        assert_eq!(text_of(child(item, "title").unwrap()), "A & B <C>");
        assert_eq!(
            text_of(child(item, "description").unwrap()),
            "Ends with ]]> inside & <tags>..."
        );
        assert_eq!(text_of(child(item, "creator").unwrap()), "O'Neil \"Dev\"");
    }

    #[test]
    fn test_rendered_content_included_when_present() {
        let mut rec = record("x", "X", "2024-01-01", "en");
        rec.rendered_html = "<p>Hi</p>".to_string();
        let xml = format_rss(&[rec], &meta(), None);
        assert!(xml.contains("<content:encoded><![CDATA[<p>Hi</p>]]></content:encoded>"));
    }
}
