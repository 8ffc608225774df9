// Core structs: RawDeal, Deal, error types
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Brand used when the upstream record carries none.
pub const DEFAULT_BRAND: &str = "Amazon";

/// Unvalidated deal record, as produced by a source or stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeal {
    pub asin: String,
    pub title: String,
    pub brand: String,
    pub image_url: String,
    pub current_price: f64,
    pub original_price: f64,
    pub last_updated: String,
}

/// Canonical, display-ready deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub asin: String,
    pub title: String,
    pub brand: String,
    pub image: String,
    pub current_price: f64,
    pub original_price: f64,
    pub amount_off: f64,
    pub percent_off: u32,
    pub dropped_at: String,
    pub link: String,
    /// Reserved for price alerts; always empty for now.
    pub alerts: Vec<String>,
}

/// Parameters of one upstream search call.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub search_term: String,
    pub amazon_domain: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("upstream responded with status {0}")]
    InvalidResponse(u16),
    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Http(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
