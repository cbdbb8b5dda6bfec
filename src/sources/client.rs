//! Shared outbound HTTP client

use anyhow::Result;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::HttpConfig;

/// Why an upstream call produced no data
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// Build the one client every adapter shares
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Send a request and decode a JSON body; non-2xx is an error
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    Ok(response.json::<T>().await?)
}


#[cfg(test)]
mod tests {
    use super::test_support::spawn_upstream;
    use super::*;
    use axum::{http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::{json, Value};

    fn client() -> Client {
        build_client(&HttpConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_body() {
        let app = Router::new().route("/ok", get(|| async { Json(json!({"a": 1})) }));
        let base = spawn_upstream(app).await;

        let value: Value = fetch_json(client().get(format!("{}/ok", base)))
            .await
            .unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_error_status() {
        let app = Router::new().route("/gone", get(|| async { AxumStatus::NOT_FOUND }));
        let base = spawn_upstream(app).await;

        let err = fetch_json::<Value>(client().get(format!("{}/gone", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_bad_body() {
        let app = Router::new().route("/text", get(|| async { "not json" }));
        let base = spawn_upstream(app).await;

        let err = fetch_json::<Value>(client().get(format!("{}/text", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }
}
