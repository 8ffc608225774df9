// Rainforest search-response parsing
use crate::config::IdentifierPolicy;
use crate::model::{FetchError, RawDeal, DEFAULT_BRAND};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

// ASCII only: Unicode case folding would turn e.g. U+017F into 'S'.
static ASIN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]{10}").expect("static regex"));

pub trait Parser {
    fn parse(&self, body: &str, fetched_at: DateTime<Utc>) -> Result<Vec<RawDeal>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    asin: Option<String>,
    title: Option<String>,
    brand: Option<String>,
    price: Option<PriceField>,
    price_before: Option<PriceField>,
    updated_at: Option<String>,
    product: Option<ProductField>,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceField {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProductField {
    asin: Option<String>,
    main_image: Option<ImageField>,
    images: Option<Vec<ImageField>>,
}

#[derive(Debug, Deserialize)]
struct ImageField {
    link: Option<String>,
}

type Extractor = fn(&SearchResult) -> Option<&str>;

/// Tried in order; the first non-blank value wins.
const IMAGE_EXTRACTORS: &[Extractor] = &[main_image_link, first_image_link, flat_image];
const ASIN_EXTRACTORS: &[Extractor] = &[top_level_asin, product_asin];

fn main_image_link(r: &SearchResult) -> Option<&str> {
    r.product.as_ref()?.main_image.as_ref()?.link.as_deref()
}

fn first_image_link(r: &SearchResult) -> Option<&str> {
    r.product.as_ref()?.images.as_ref()?.first()?.link.as_deref()
}

fn flat_image(r: &SearchResult) -> Option<&str> {
    r.image.as_deref()
}

fn top_level_asin(r: &SearchResult) -> Option<&str> {
    r.asin.as_deref()
}

fn product_asin(r: &SearchResult) -> Option<&str> {
    r.product.as_ref()?.asin.as_deref()
}

fn first_present<'a>(record: &'a SearchResult, extractors: &[Extractor]) -> Option<&'a str> {
    extractors
        .iter()
        .filter_map(|extract| extract(record))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Resolves the identifier under the given policy. Returns an empty string when
/// nothing usable is found; the validator drops such records later.
pub fn resolve_asin(raw: &str, policy: IdentifierPolicy) -> String {
    match policy {
        IdentifierPolicy::Exact => raw.trim().to_string(),
        IdentifierPolicy::Extract => ASIN_RUN
            .find(raw)
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default(),
    }
}

/// Lenient parser: shape differences are absorbed here, never rejected.
pub struct RainforestParser {
    identifier_policy: IdentifierPolicy,
}

impl RainforestParser {
    pub fn new(identifier_policy: IdentifierPolicy) -> Self {
        Self { identifier_policy }
    }

    fn to_raw_deal(&self, record: &SearchResult, fetched_at: DateTime<Utc>) -> RawDeal {
        let asin = first_present(record, ASIN_EXTRACTORS)
            .map(|raw| resolve_asin(raw, self.identifier_policy))
            .unwrap_or_default();
        let current_price = record.price.as_ref().and_then(|p| p.value);
        let original_price = record
            .price_before
            .as_ref()
            .and_then(|p| p.value)
            .or(current_price);

        RawDeal {
            asin,
            title: record.title.as_deref().unwrap_or("").trim().to_string(),
            brand: record
                .brand
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .unwrap_or(DEFAULT_BRAND)
                .to_string(),
            image_url: first_present(record, IMAGE_EXTRACTORS)
                .unwrap_or("")
                .to_string(),
            current_price: current_price.unwrap_or(0.0),
            original_price: original_price.unwrap_or(0.0),
            last_updated: record
                .updated_at
                .clone()
                .unwrap_or_else(|| fetched_at.to_rfc3339()),
        }
    }
}

impl Parser for RainforestParser {
    fn parse(&self, body: &str, fetched_at: DateTime<Utc>) -> Result<Vec<RawDeal>, FetchError> {
        let document: Value =
            serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

        let Some(results) = document.get("search_results").and_then(Value::as_array) else {
            debug!("Response has no search_results array");
            return Ok(Vec::new());
        };

        let mut deals = Vec::with_capacity(results.len());
        for (index, item) in results.iter().enumerate() {
            match SearchResult::deserialize(item) {
                Ok(record) => deals.push(self.to_raw_deal(&record, fetched_at)),
                Err(e) => debug!("Skipping malformed search result #{}: {}", index, e),
            }
        }

        Ok(deals)
    }
}
