//! JSON API handlers

use axum::{
    extract::{Path, Query, State},
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::{ApiError, AppState, RequestLocale};
use crate::config::SiteConfig;
use crate::content::{NewsListing, RecordSummary};
use crate::helpers::{extract_headings, Heading};
use crate::sources::{cache_control, Fetched};

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    tag: Option<String>,
}

#[derive(Serialize)]
struct NewsDetail<'a> {
    #[serde(flatten)]
    summary: RecordSummary<'a>,
    body: &'a str,
    html: &'a str,
    toc: Vec<Heading>,
}

/// `GET /api/news`
pub async fn news_list(
    State(state): State<Arc<AppState>>,
    locale: RequestLocale,
    Query(query): Query<NewsQuery>,
) -> Result<Response, ApiError> {
    let records = state.list_records().await?;
    let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

    let posts: Vec<_> = records
        .iter()
        .filter(|r| locale.filter.map_or(true, |l| r.lang == l.code()))
        .filter(|r| tag.map_or(true, |t| r.tags.iter().any(|rt| rt == t)))
        .map(|r| r.summary(state.config.news_link(&r.slug, &r.lang)))
        .collect();

    Ok(Json(NewsListing::new(posts, locale.locale)).into_response())
}

/// `GET /api/news/:slug`
pub async fn news_item(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let record = state
        .find_record(slug.clone())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("news item {:?}", slug)))?;

    let detail = NewsDetail {
        summary: record.summary(state.config.news_link(&record.slug, &record.lang)),
        body: &record.body,
        html: &record.rendered_html,
        toc: extract_headings(&record.body),
    };
    Ok(Json(detail).into_response())
}

fn fetched_response<T: Serialize>(fetched: Fetched<T>, stale: Duration) -> Response {
    let cache = cache_control(fetched.revalidate, stale);
    ([(CACHE_CONTROL, cache)], Json(fetched)).into_response()
}

fn stale_window(config: &SiteConfig) -> Duration {
    Duration::from_secs(config.feed.stale)
}

/// `GET /api/releases`
pub async fn releases(State(state): State<Arc<AppState>>) -> Response {
    fetched_response(state.github.releases().await, stale_window(&state.config))
}

/// `GET /api/contributors`
pub async fn contributors(State(state): State<Arc<AppState>>) -> Response {
    fetched_response(state.github.contributors().await, stale_window(&state.config))
}

/// `GET /api/anime`
pub async fn anime(State(state): State<Arc<AppState>>) -> Response {
    fetched_response(state.bangumi.collections().await, stale_window(&state.config))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use serde_json::Value;

    async fn json_of(uri: &str) -> (StatusCode, Value) {
        let (_dir, app) = fixture();
        let response = get(&app, uri, &[]).await;
        let status = response.status();
        let body = body_string(response).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_news_list() {
        let (status, json) = json_of("/api/news").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 2);
        assert_eq!(json["lang"], "en");

        let first = &json["posts"][0];
        assert_eq!(first["slug"], "ni-hao");
        assert_eq!(first["url"], "https://xdyou.example.com/news/ni-hao?lang=zh");
        assert_eq!(first["tags"][0], "notice");
        assert!(first.get("body").is_none());
        assert!(first.get("rendered_html").is_none());

        let second = &json["posts"][1];
        assert_eq!(second["title"], "Hello, World!");
        assert_eq!(second["url"], "https://xdyou.example.com/news/hello-world");
        let excerpt = second["excerpt"].as_str().unwrap();
        assert!(excerpt.starts_with("Some link text."));
        assert!(excerpt.ends_with("More...."));
    }

    #[tokio::test]
    async fn test_news_list_filters() {
        let (_, json) = json_of("/api/news?lang=zh").await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["lang"], "zh");
        assert_eq!(json["posts"][0]["slug"], "ni-hao");

        let (_, json) = json_of("/api/news?tag=release").await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["posts"][0]["slug"], "hello-world");

        let (status, json) = json_of("/api/news?tag=nothing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 0);
        assert!(json["posts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_news_item() {
        let (status, json) = json_of("/api/news/hello-world").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Hello, World!");
        assert!(json["html"].as_str().unwrap().contains(r#"<h2 id="details">"#));
        assert_eq!(json["toc"][0]["id"], "intro");
        assert_eq!(json["toc"][1]["level"], 2);
    }

    #[tokio::test]
    async fn test_news_item_missing() {
        let (status, json) = json_of("/api/news/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_sources_degrade_to_empty() {
        let (_dir, app) = fixture();
        for uri in ["/api/releases", "/api/contributors", "/api/anime"] {
            let response = get(&app, uri, &[]).await;
            assert_eq!(response.status(), StatusCode::OK);
            let cache = response.headers()["cache-control"].to_str().unwrap().to_string();
            assert!(cache.starts_with("public, s-maxage=3600"));
            let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(json["total"], 0);
        }
    }
}
