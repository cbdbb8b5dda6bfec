//! RSS and Atom endpoints

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use super::{ApiError, AppState, RequestLocale};
use crate::feed::{format_atom, format_rss, FeedMeta, ATOM_CONTENT_TYPE, RSS_CONTENT_TYPE};
use crate::sources::cache_control;

#[derive(Debug, Clone, Copy)]
enum FeedFormat {
    Rss,
    Atom,
}

/// `GET /rss.xml`
pub async fn rss(
    State(state): State<Arc<AppState>>,
    locale: RequestLocale,
) -> Result<Response, ApiError> {
    feed_response(&state, locale, FeedFormat::Rss).await
}

/// `GET /atom.xml`
pub async fn atom(
    State(state): State<Arc<AppState>>,
    locale: RequestLocale,
) -> Result<Response, ApiError> {
    feed_response(&state, locale, FeedFormat::Atom).await
}

async fn feed_response(
    state: &AppState,
    locale: RequestLocale,
    format: FeedFormat,
) -> Result<Response, ApiError> {
    let records = state.list_records().await?;

    // A filtered feed speaks the language of its items
    let text_locale = locale.filter.unwrap_or(locale.locale);
    let meta = FeedMeta::from_config(
        &state.config,
        &state.dict,
        text_locale,
        &state.loader,
        Utc::now(),
    );

    let (body, content_type) = match format {
        FeedFormat::Rss => (format_rss(&records, &meta, locale.filter), RSS_CONTENT_TYPE),
        FeedFormat::Atom => (format_atom(&records, &meta, locale.filter), ATOM_CONTENT_TYPE),
    };
    let cache = cache_control(
        Duration::from_secs(state.config.feed.revalidate),
        Duration::from_secs(state.config.feed.stale),
    );

    Ok((
        [(CONTENT_TYPE, content_type.to_string()), (CACHE_CONTROL, cache)],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_rss_endpoint() {
        let (_dir, app) = fixture();
        let response = get(&app, "/rss.xml", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/rss+xml; charset=utf-8"
        );
        assert_eq!(
            response.headers()["cache-control"],
            "public, s-maxage=3600, stale-while-revalidate=86400"
        );

        let body = body_string(response).await;
        let doc = roxmltree::Document::parse(&body).unwrap();
        let items = doc
            .descendants()
            .filter(|n| n.tag_name().name() == "item")
            .count();
        assert_eq!(items, 2);
    }

    #[tokio::test]
    async fn test_atom_endpoint_with_filter() {
        let (_dir, app) = fixture();
        let response = get(&app, "/atom.xml?lang=en", &[("accept-language", "zh-CN")]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/atom+xml; charset=utf-8"
        );

        let body = body_string(response).await;
        assert!(body.contains("<entry><id>https://xdyou.example.com/news/hello-world</id>"));
        assert!(body.contains("<updated>2024-01-15T00:00:00Z</updated>"));
        assert!(!body.contains("ni-hao"));
    }

    #[tokio::test]
    async fn test_filter_to_nothing_is_still_a_feed() {
        let (dir, app) = fixture();
        std::fs::remove_file(dir.path().join("content/news/ni-hao.md")).unwrap();

        let response = get(&app, "/rss.xml?lang=zh", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        let doc = roxmltree::Document::parse(&body).unwrap();
        assert!(doc.descendants().all(|n| n.tag_name().name() != "item"));
        assert!(body.contains("此订阅源暂无中文文章。"));
    }
}
