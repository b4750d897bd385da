use std::time::Duration;

use serde::Deserialize;

use super::{
    validate_query, ImageFetcher, ImageRecord, SearchError, SearchResult, SearchService,
    ServiceError,
};
use crate::config::AppConfig;
use crate::scene::{LoadError, LoadResult};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ImageRecord>,
}

fn build_http() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
}

/// Blocking client for `GET /search/photos`. Run it on the worker bridge, never the UI thread.
pub struct UnsplashClient {
    http: reqwest::blocking::Client,
    access_key: Option<String>,
    base_url: String,
    per_page: u32,
}

impl UnsplashClient {
    pub fn new(
        access_key: Option<String>,
        base_url: &str,
        per_page: u32,
    ) -> Result<Self, ServiceError> {
        let http = build_http().map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self {
            http,
            access_key: access_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            per_page: per_page.max(1),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        Self::new(
            config.resolve_unsplash_key(),
            &config.unsplash_api_base,
            config.search_per_page,
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}/search/photos", self.base_url)
    }
}

impl SearchService for UnsplashClient {
    fn search(&self, query: &str) -> SearchResult<Vec<ImageRecord>> {
        let query = validate_query(query)?;
        let Some(key) = self.access_key.as_deref() else {
            tracing::error!(
                "unsplash access key is missing; set it in config.json or UNSPLASH_ACCESS_KEY"
            );
            return Err(ServiceError::MissingApiKey.into());
        };

        tracing::debug!(query, per_page = self.per_page, "searching unsplash");
        let per_page = self.per_page.to_string();
        let response = self
            .http
            .get(self.search_url())
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .header(reqwest::header::AUTHORIZATION, format!("Client-ID {key}"))
            .send()
            .map_err(|e| {
                tracing::warn!(error = %e, "unsplash request failed");
                ServiceError::Network(e.to_string())
            })?;

        let status = response.status();
        check_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
        )?;
        let body = response
            .text()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let results = parse_search_body(&body)?;
        tracing::info!(query, count = results.len(), "unsplash search complete");
        Ok(results)
    }
}

fn check_status(status: u16, reason: &str) -> Result<(), ServiceError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(ServiceError::InvalidKey),
        429 => Err(ServiceError::RateLimited),
        _ => Err(ServiceError::Status {
            status,
            reason: reason.to_string(),
        }),
    }
}

fn parse_search_body(body: &str) -> SearchResult<Vec<ImageRecord>> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
    if parsed.results.is_empty() {
        return Err(SearchError::NoResults);
    }
    Ok(parsed.results)
}

/// Fetches image bytes over HTTP(S).
pub struct HttpImageFetcher {
    http: reqwest::blocking::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self { http: build_http()? })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> LoadResult<Vec<u8>> {
        let fetch_error = |message: String| LoadError::Fetch {
            url: url.to_string(),
            message,
        };
        let response = self
            .http
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| fetch_error(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        tracing::debug!(url, bytes = bytes.len(), "image fetched");
        Ok(bytes.to_vec())
    }
}
