//! Heading anchors and table of contents
//!
//! The renderer and the TOC extractor both go through [`heading_id`] and
//! [`heading_text_piece`], so an anchor link built here always matches the
//! `id` the renderer put on the heading.

use lazy_static::lazy_static;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::Regex;

use crate::content::markdown::parser_options;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Anchor id for a heading: lowercase, drop everything except word
/// characters, whitespace and `-`, then turn whitespace runs into `-`
pub fn heading_id(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    WHITESPACE.replace_all(stripped.trim(), "-").into_owned()
}

/// The part of a heading's inline content that counts toward its text
pub(crate) fn heading_text_piece<'a>(event: &'a Event<'_>) -> Option<&'a str> {
    match event {
        Event::Text(text) | Event::Code(text) | Event::InlineMath(text) => Some(text.as_ref()),
        Event::SoftBreak | Event::HardBreak => Some(" "),
        _ => None,
    }
}

/// A heading found in a Markdown document
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Collect headings without rendering the document
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<(HeadingLevel, Option<String>, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match &event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((*level, id.as_ref().map(|s| s.to_string()), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, explicit_id, text)) = current.take() {
                    let id = explicit_id.unwrap_or_else(|| heading_id(&text));
                    headings.push(Heading {
                        level: level as u8,
                        text,
                        id,
                    });
                }
            }
            _ => {
                if let Some((_, _, text)) = current.as_mut() {
                    if let Some(piece) = heading_text_piece(&event) {
                        text.push_str(piece);
                    }
                }
            }
        }
    }

    headings
}

/// Nested ordered list linking to each heading up to `max_depth`
pub fn toc_html(headings: &[Heading], max_depth: u8) -> String {
    let mut html = r#"<ol class="toc">"#.to_string();
    let base = headings
        .iter()
        .filter(|h| h.level <= max_depth)
        .map(|h| h.level)
        .min()
        .unwrap_or(1);
    let mut current_level = base;

    for heading in headings.iter().filter(|h| h.level <= max_depth) {
        while current_level < heading.level {
            html.push_str("<ol>");
            current_level += 1;
        }
        while current_level > heading.level {
            html.push_str("</ol>");
            current_level -= 1;
        }
        html.push_str(&format!(
            "<li class=\"toc-item toc-level-{}\"><a class=\"toc-link\" href=\"#{}\"><span class=\"toc-text\">{}</span></a></li>",
            heading.level,
            heading.id,
            escape_html(&heading.text)
        ));
    }

    while current_level > base {
        html.push_str("</ol>");
        current_level -= 1;
    }

    html.push_str("</ol>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
