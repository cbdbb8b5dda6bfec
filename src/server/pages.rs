//! Server-rendered article page

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState, RequestLocale};
use crate::content::ContentRecord;
use crate::helpers::{date_xml, escape_xml, extract_headings, localized, toc_html};
use crate::i18n::Locale;

const TOC_DEPTH: u8 = 3;

/// `GET /news/:slug`
pub async fn news_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    locale: RequestLocale,
) -> Result<Response, ApiError> {
    let page = match state.find_record(slug).await? {
        Some(record) => (StatusCode::OK, Html(article_page(&state, &record, locale.locale))),
        None => (StatusCode::NOT_FOUND, Html(not_found_page(&state, locale.locale))),
    };
    Ok(page.into_response())
}

fn t(state: &AppState, locale: Locale, key: &str) -> String {
    escape_xml(&state.dict.get(locale, key))
}

fn page_head(state: &AppState, locale: Locale, title: &str) -> String {
    let rss = localized("/rss.xml", locale, state.config.language);
    let atom = localized("/atom.xml", locale, state.config.language);
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
<link rel="alternate" type="application/rss+xml" href="{rss}">
<link rel="alternate" type="application/atom+xml" href="{atom}">
</head>
<body>
<nav><a href="{home}">{back}</a></nav>
"#,
        lang = locale.html_lang(),
        title = escape_xml(title),
        site = escape_xml(&state.config.title),
        rss = escape_xml(&rss),
        atom = escape_xml(&atom),
        home = escape_xml(&localized("/", locale, state.config.language)),
        back = t(state, locale, "page.back"),
    )
}

fn article_page(state: &AppState, record: &ContentRecord, locale: Locale) -> String {
    let mut html = page_head(state, locale, &record.title);
    html.push_str("<article>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_xml(&record.title)));

    let date = record.timestamp(state.loader.timezone());
    html.push_str(&format!(
        "<p class=\"meta\"><time datetime=\"{}\">{}</time> · {} {}</p>\n",
        date_xml(&date),
        escape_xml(&record.date),
        t(state, locale, "page.by"),
        escape_xml(&record.author)
    ));

    if !record.tags.is_empty() {
        let tags = record
            .tags
            .iter()
            .map(|tag| format!("<span class=\"tag\">{}</span>", escape_xml(tag)))
            .collect::<Vec<_>>()
            .join(" ");
        html.push_str(&format!(
            "<p class=\"tags\">{}: {}</p>\n",
            t(state, locale, "page.tags"),
            tags
        ));
    }

    let headings = extract_headings(&record.body);
    if !headings.is_empty() {
        html.push_str(&format!(
            "<nav class=\"toc\"><h2>{}</h2>{}</nav>\n",
            t(state, locale, "page.toc"),
            toc_html(&headings, TOC_DEPTH)
        ));
    }

    html.push_str(&format!(
        "<div class=\"content\">\n{}</div>\n</article>\n</body>\n</html>\n",
        record.rendered_html
    ));
    html
}

fn not_found_page(state: &AppState, locale: Locale) -> String {
    let title = state.dict.get(locale, "page.not_found");
    let mut html = page_head(state, locale, &title);
    html.push_str(&format!(
        "<main>\n<h1>{}</h1>\n<p>{}</p>\n</main>\n</body>\n</html>\n",
        escape_xml(&title),
        t(state, locale, "page.not_found_body")
    ));
    html
}
