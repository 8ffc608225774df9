use crate::model::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.rainforestapi.com/request";
pub const DEFAULT_CACHE_KEY: &str = "rainforest-deals";

/// How strictly image URLs are checked during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    /// Absolute http(s) URL.
    Scheme,
    /// Absolute http(s) URL on one of the trusted domains or a subdomain of one.
    TrustedHost,
}

/// How the identifier is pulled out of an upstream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierPolicy {
    /// Take the field as is (trimmed).
    Exact,
    /// First run of 10 alphanumerics, case-insensitive, upper-cased.
    Extract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    Memory,
    Snapshot,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Slot key for the memory backend. The snapshot backend has a single
    /// slot, the file at `snapshot_path`, and ignores it.
    pub key: String,
    pub ttl_seconds: u64,
    /// Only read by the snapshot backend.
    pub snapshot_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            key: DEFAULT_CACHE_KEY.to_string(),
            ttl_seconds: 3600,
            snapshot_path: PathBuf::from("data/deals-cache.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub image_policy: ImagePolicy,
    /// Registrable domains accepted under `ImagePolicy::TrustedHost`, matched
    /// on whole labels (`m.media-amazon.com` matches `media-amazon.com`).
    pub trusted_image_hosts: Vec<String>,
    pub identifier_policy: IdentifierPolicy,
    pub max_results: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            image_policy: ImagePolicy::TrustedHost,
            trusted_image_hosts: vec![
                "amazon.com".to_string(),
                "media-amazon.com".to_string(),
                "ssl-images-amazon.com".to_string(),
            ],
            identifier_policy: IdentifierPolicy::Extract,
            max_results: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AffiliateConfig {
    pub base_url: String,
    pub tag: String,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.com/dp/".to_string(),
            tag: "deals03ce-20".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub use_live_source: bool,
    pub rainforest_api_key: Option<String>,
    pub api_url: String,
    pub amazon_domain: String,
    pub search_term: String,
    pub request_timeout_seconds: u64,
    pub cache: CacheConfig,
    pub validation: ValidationPolicy,
    pub affiliate: AffiliateConfig,
    pub sort: String,
    pub refresh_interval_seconds: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_live_source: false,
            rainforest_api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            amazon_domain: "amazon.com".to_string(),
            search_term: "garage tools deals".to_string(),
            request_timeout_seconds: 10,
            cache: CacheConfig::default(),
            validation: ValidationPolicy::default(),
            affiliate: AffiliateConfig::default(),
            sort: "percent".to_string(),
            refresh_interval_seconds: None,
        }
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("use_live_source", &self.use_live_source)
            .field(
                "rainforest_api_key",
                &self.rainforest_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("api_url", &self.api_url)
            .field("amazon_domain", &self.amazon_domain)
            .field("search_term", &self.search_term)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("cache", &self.cache)
            .field("validation", &self.validation)
            .field("affiliate", &self.affiliate)
            .field("sort", &self.sort)
            .field("refresh_interval_seconds", &self.refresh_interval_seconds)
            .finish()
    }
}

impl AppConfig {
    /// Overlays `USE_RAIN_API` and `RAINFOREST_API_KEY` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(
            std::env::var("USE_RAIN_API").ok().as_deref(),
            std::env::var("RAINFOREST_API_KEY").ok().as_deref(),
        );
    }

    fn apply_vars(&mut self, use_rain_api: Option<&str>, api_key: Option<&str>) {
        if let Some(flag) = use_rain_api {
            self.use_live_source = parse_flag(flag);
        }
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            self.rainforest_api_key = Some(key.to_string());
        }
    }
}

/// Only a case-insensitive "true" enables the flag.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
