//! External data adapters
//!
//! Every adapter swallows upstream failures: a bad status, a timeout or an
//! unexpected body is logged and becomes an empty list. Callers only ever
//! see data or "no data".

pub mod bangumi;
pub mod client;
pub mod github;

pub use bangumi::{AnimeEntry, BangumiSource};
pub use client::{build_client, FetchError};
pub use github::{Contributor, GithubSource, Release, ReleaseAsset};

use serde::Serialize;
use std::time::Duration;

/// Adapter output plus how long a shared cache may keep it
#[derive(Debug, Clone, Serialize)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub total: usize,
    #[serde(skip)]
    pub revalidate: Duration,
}

impl<T> Fetched<T> {
    pub fn new(items: Vec<T>, revalidate: Duration) -> Self {
        Self {
            total: items.len(),
            items,
            revalidate,
        }
    }

    pub fn empty(revalidate: Duration) -> Self {
        Self::new(Vec::new(), revalidate)
    }
}

/// `Cache-Control` value for a shared cache in front of the service
pub fn cache_control(revalidate: Duration, stale: Duration) -> String {
    format!(
        "public, s-maxage={}, stale-while-revalidate={}",
        revalidate.as_secs(),
        stale.as_secs()
    )
}
