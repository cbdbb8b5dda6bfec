//! Request locale extractor

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{
        header::{ACCEPT_LANGUAGE, COOKIE},
        request::Parts,
    },
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;

use super::AppState;
use crate::i18n::{cookie_value, resolve, Locale, LocaleSource, LOCALE_COOKIE};

#[derive(Debug, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// Locale resolved for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale {
    /// Language for UI text
    pub locale: Locale,
    /// Supported locale named explicitly by `?lang=`; used to filter content
    pub filter: Option<Locale>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let query = Query::<LangQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.lang);
        let cookie = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| cookie_value(header, LOCALE_COOKIE));
        let accept_language = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        let source = LocaleSource {
            query: query.as_deref(),
            cookie,
            accept_language,
        };

        Ok(Self {
            locale: resolve(&source, state.config.language),
            filter: query.as_deref().and_then(Locale::from_code),
        })
    }
}
