//! GitHub releases and contributors

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::client::fetch_json;
use super::Fetched;
use crate::config::GithubConfig;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// A published release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Release {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub html_url: String,
    pub published_at: Option<String>,
    pub prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub browser_download_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub contributions: u64,
}

#[derive(Debug, Deserialize)]
struct RawRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    assets: Vec<ReleaseAsset>,
}

impl From<RawRelease> for Release {
    fn from(raw: RawRelease) -> Self {
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| raw.tag_name.clone());
        Self {
            tag_name: raw.tag_name,
            name,
            body: raw.body.unwrap_or_default(),
            html_url: raw.html_url,
            published_at: raw.published_at,
            prerelease: raw.prerelease,
            assets: raw.assets,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawContributor {
    login: String,
    #[serde(default)]
    avatar_url: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    contributions: u64,
    #[serde(default, rename = "type")]
    kind: String,
}

impl RawContributor {
    fn is_bot(&self) -> bool {
        self.kind == "Bot" || self.login.ends_with("[bot]")
    }
}

/// Client for one repository's public data
#[derive(Clone)]
pub struct GithubSource {
    client: Client,
    config: GithubConfig,
}

impl GithubSource {
    pub fn new(client: Client, config: GithubConfig) -> Self {
        Self { client, config }
    }

    fn is_configured(&self) -> bool {
        !self.config.owner.trim().is_empty() && !self.config.repo.trim().is_empty()
    }

    fn request(&self, endpoint: &str) -> RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            endpoint
        );
        let mut request = self
            .client
            .get(url)
            .query(&[("per_page", self.config.per_page)])
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION);
        if let Some(token) = self.config.token.as_deref().filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        request
    }

    /// Published releases, newest first as GitHub returns them
    pub async fn releases(&self) -> Fetched<Release> {
        let revalidate = self.config.revalidate();
        if !self.is_configured() {
            tracing::debug!("GitHub repository not configured, no releases");
            return Fetched::empty(revalidate);
        }

        match fetch_json::<Vec<RawRelease>>(self.request("releases")).await {
            Ok(raw) => {
                let items = raw
                    .into_iter()
                    .filter(|r| !r.draft)
                    .map(Release::from)
                    .collect();
                Fetched::new(items, revalidate)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch GitHub releases: {}", e);
                Fetched::empty(revalidate)
            }
        }
    }

    /// Human contributors, bots removed
    pub async fn contributors(&self) -> Fetched<Contributor> {
        let revalidate = self.config.revalidate();
        if !self.is_configured() {
            tracing::debug!("GitHub repository not configured, no contributors");
            return Fetched::empty(revalidate);
        }

        match fetch_json::<Vec<RawContributor>>(self.request("contributors")).await {
            Ok(raw) => {
                let items = raw
                    .into_iter()
                    .filter(|c| !c.is_bot())
                    .map(|c| Contributor {
                        login: c.login,
                        avatar_url: c.avatar_url,
                        html_url: c.html_url,
                        contributions: c.contributions,
                    })
                    .collect();
                Fetched::new(items, revalidate)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch GitHub contributors: {}", e);
                Fetched::empty(revalidate)
            }
        }
    }
}
