//! Bangumi (bgm.tv) user collections

use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::client::fetch_json;
use super::Fetched;
use crate::config::BangumiConfig;
use crate::helpers::encode_segment;

const SUBJECT_URL: &str = "https://bgm.tv/subject";

/// One collected subject, flattened for the site
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeEntry {
    pub subject_id: u64,
    pub name: String,
    /// Chinese title, or `name` when there is none
    pub name_cn: String,
    pub image: String,
    /// Community score
    pub score: f64,
    /// The collector's own rating, 0 when unrated
    pub rating: u8,
    pub episodes: u32,
    pub updated_at: String,
    pub tags: Vec<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CollectionPage {
    #[serde(default)]
    data: Vec<RawCollection>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    subject_id: u64,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    rate: u8,
    #[serde(default)]
    subject: Option<RawSubject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubject {
    name: String,
    name_cn: String,
    images: Option<RawImages>,
    score: f64,
    eps: u32,
    tags: Vec<RawTag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawImages {
    large: String,
    common: String,
    medium: String,
}

#[derive(Debug, Deserialize)]
struct RawTag {
    name: String,
}

impl From<RawCollection> for AnimeEntry {
    fn from(raw: RawCollection) -> Self {
        let subject = raw.subject.unwrap_or_default();
        let name_cn = if subject.name_cn.trim().is_empty() {
            subject.name.clone()
        } else {
            subject.name_cn
        };
        let image = subject
            .images
            .map(|i| {
                [i.large, i.common, i.medium]
                    .into_iter()
                    .find(|url| !url.is_empty())
                    .unwrap_or_default()
            })
            .unwrap_or_default();

        Self {
            subject_id: raw.subject_id,
            name: subject.name,
            name_cn,
            image,
            score: subject.score,
            rating: raw.rate,
            episodes: subject.eps,
            updated_at: raw.updated_at,
            tags: subject.tags.into_iter().map(|t| t.name).collect(),
            url: format!("{}/{}", SUBJECT_URL, raw.subject_id),
        }
    }
}

/// Reads one user's public collection list
#[derive(Clone)]
pub struct BangumiSource {
    client: Client,
    config: BangumiConfig,
}

impl BangumiSource {
    pub fn new(client: Client, config: BangumiConfig) -> Self {
        Self { client, config }
    }

    /// First page of the configured collection, as the API orders it
    pub async fn collections(&self) -> Fetched<AnimeEntry> {
        let revalidate = self.config.revalidate();
        let username = self.config.username.trim();
        if username.is_empty() {
            tracing::debug!("Bangumi username not configured, no collections");
            return Fetched::empty(revalidate);
        }

        let url = format!(
            "{}/v0/users/{}/collections",
            self.config.api_base.trim_end_matches('/'),
            encode_segment(username)
        );
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("subject_type", self.config.subject_type as u32),
                ("type", self.config.collection_type as u32),
                ("limit", self.config.limit),
                ("offset", 0),
            ]);

        match fetch_json::<CollectionPage>(request).await {
            Ok(page) => Fetched::new(
                page.data.into_iter().map(AnimeEntry::from).collect(),
                revalidate,
            ),
            Err(e) => {
                tracing::warn!("Failed to fetch Bangumi collections for {}: {}", username, e);
                Fetched::empty(revalidate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::sources::build_client;
    use crate::sources::client::test_support::spawn_upstream;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn source(base: &str, username: &str) -> BangumiSource {
        let config = BangumiConfig {
            username: username.to_string(),
            api_base: base.to_string(),
            ..Default::default()
        };
        BangumiSource::new(build_client(&HttpConfig::default()).unwrap(), config)
    }

    async fn collections_handler(
        Path(user): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Result<Json<Value>, StatusCode> {
        if user != "bender" || query.get("subject_type").map(String::as_str) != Some("2") {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(Json(json!({
            "data": [
                {
                    "subject_id": 1001,
                    "updated_at": "2024-04-01T10:00:00+08:00",
                    "rate": 9,
                    "subject": {
                        "id": 1001,
                        "name": "Frieren",
                        "name_cn": "葬送的芙莉莲",
                        "images": {"large": "https://lain.bgm.tv/l/1001.jpg", "common": "c"},
                        "score": 9.1,
                        "eps": 28,
                        "tags": [{"name": "fantasy", "count": 100}]
                    }
                },
                {
                    "subject_id": 1002,
                    "subject": {"name": "Lain", "name_cn": "", "images": null}
                }
            ],
            "total": 2,
            "limit": 30,
            "offset": 0
        })))
    }

    #[tokio::test]
    async fn test_collections_normalized() {
        let app = Router::new().route(
            "/v0/users/:user/collections",
            get(collections_handler),
        );
        let base = spawn_upstream(app).await;

        let fetched = source(&base, "bender").collections().await;
        assert_eq!(fetched.total, 2);

        let first = &fetched.items[0];
        assert_eq!(first.name_cn, "葬送的芙莉莲");
        assert_eq!(first.image, "https://lain.bgm.tv/l/1001.jpg");
        assert_eq!(first.rating, 9);
        assert_eq!(first.episodes, 28);
        assert_eq!(first.tags, vec!["fantasy"]);
        assert_eq!(first.url, "https://bgm.tv/subject/1001");

        let second = &fetched.items[1];
        assert_eq!(second.name_cn, "Lain");
        assert_eq!(second.image, "");
        assert_eq!(second.rating, 0);
    }

    #[tokio::test]
    async fn test_unknown_user_is_empty() {
        let app = Router::new().route(
            "/v0/users/:user/collections",
            get(collections_handler),
        );
        let base = spawn_upstream(app).await;
        assert!(source(&base, "nobody").collections().await.items.is_empty());
    }

    #[tokio::test]
    async fn test_missing_username_skips_request() {
        let fetched = source("http://127.0.0.1:9", "  ").collections().await;
        assert!(fetched.items.is_empty());
        assert_eq!(fetched.revalidate, BangumiConfig::default().revalidate());
    }
}
