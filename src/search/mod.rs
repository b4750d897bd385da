//! Stock-photo search contract: record types, query validation, error taxonomy and the
//! fixed sample dataset offered when the service is unavailable.

mod unsplash;

pub use unsplash::{HttpImageFetcher, UnsplashClient};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::LoadResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub regular: String,
    pub small: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// One search hit. `urls` is optional on the wire; the editor refuses records without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub urls: Option<ImageUrls>,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub user: Option<ImageAuthor>,
}

impl ImageRecord {
    pub fn regular_url(&self) -> Option<&str> {
        self.urls
            .as_ref()
            .map(|urls| urls.regular.as_str())
            .filter(|url| !url.trim().is_empty())
    }

    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.name.as_deref())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("API configuration error. Please check console for details.")]
    MissingApiKey,
    #[error("Invalid API key. Please check your Unsplash API credentials.")]
    InvalidKey,
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Error: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter a search term")]
    Validation,
    #[error("No images found for your search. Try different keywords.")]
    NoResults,
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl SearchError {
    /// Whether the host should offer [`sample_images`] instead of a retry prompt.
    pub const fn is_service_failure(&self) -> bool {
        matches!(self, Self::Service(_))
    }
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;

pub trait SearchService {
    fn search(&self, query: &str) -> SearchResult<Vec<ImageRecord>>;
}

/// Fetches the encoded bytes behind an image URL.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> LoadResult<Vec<u8>>;
}

/// Trimmed query, or [`SearchError::Validation`] when nothing is left.
pub fn validate_query(query: &str) -> SearchResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SearchError::Validation);
    }
    Ok(trimmed)
}

pub fn sample_images() -> Vec<ImageRecord> {
    vec![
        sample(
            "mock1",
            "https://images.unsplash.com/photo-1579546929518-9e396f3cc809",
            "Mock image 1",
        ),
        sample(
            "mock2",
            "https://images.unsplash.com/photo-1518791841217-8f162f1e1131",
            "Mock image 2",
        ),
    ]
}

fn sample(id: &str, regular: &str, alt: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        urls: Some(ImageUrls {
            regular: regular.to_string(),
            small: format!("{regular}?w=400"),
        }),
        alt_description: Some(alt.to_string()),
        user: Some(ImageAuthor {
            name: Some("Mock User".to_string()),
        }),
    }
}
