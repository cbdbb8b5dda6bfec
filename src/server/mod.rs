//! HTTP server: JSON API, feeds, article pages and static files

mod api;
mod error;
mod feeds;
mod locale;
mod pages;

pub use error::ApiError;
pub use locale::RequestLocale;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentLoader, ContentRecord};
use crate::i18n::Dictionary;
use crate::sources::{build_client, BangumiSource, GithubSource};
use crate::Site;

/// Everything a handler needs; immutable after startup
pub struct AppState {
    pub config: SiteConfig,
    pub loader: ContentLoader,
    pub dict: Dictionary,
    pub github: GithubSource,
    pub bangumi: BangumiSource,
}

impl AppState {
    pub fn from_site(site: &Site) -> Result<Self> {
        let client = build_client(&site.config.http)?;
        Ok(Self {
            config: site.config.clone(),
            loader: site.loader(),
            dict: site.dictionary()?,
            github: GithubSource::new(client.clone(), site.config.github.clone()),
            bangumi: BangumiSource::new(client, site.config.bangumi.clone()),
        })
    }

    /// All records, read on a blocking thread
    pub(crate) async fn list_records(&self) -> Result<Vec<ContentRecord>, ApiError> {
        let loader = self.loader.clone();
        Ok(tokio::task::spawn_blocking(move || loader.list_all()).await?)
    }

    /// One rendered record, read on a blocking thread
    pub(crate) async fn find_record(&self, slug: String) -> Result<Option<ContentRecord>, ApiError> {
        let loader = self.loader.clone();
        Ok(tokio::task::spawn_blocking(move || loader.get_by_slug(&slug)).await?)
    }
}

/// Build the router; unmatched paths fall through to `public_dir`
pub fn router(state: Arc<AppState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/news", get(api::news_list))
        .route("/api/news/:slug", get(api::news_item))
        .route("/api/releases", get(api::releases))
        .route("/api/contributors", get(api::contributors))
        .route("/api/anime", get(api::anime))
        .route("/rss.xml", get(feeds::rss))
        .route("/atom.xml", get(feeds::atom))
        .route("/news/:slug", get(pages::news_page))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and block until it stops
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_site(site)?);
    let app = router(state, site.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    if !site.content_dir.is_dir() {
        tracing::warn!(
            "Content directory {:?} does not exist; listings and feeds will be empty",
            site.content_dir
        );
    }

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
