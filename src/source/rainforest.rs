use crate::config::AppConfig;
use crate::model::{FetchError, RawDeal, SearchRequest};
use crate::parser::{Parser, RainforestParser};
use crate::source::DealSource;

use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Live source backed by the Rainforest product search API.
pub struct RainforestSource {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    request: SearchRequest,
    parser: RainforestParser,
}

impl RainforestSource {
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("garage-deals/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.rainforest_api_key.clone(),
            request: SearchRequest {
                search_term: config.search_term.clone(),
                amazon_domain: config.amazon_domain.clone(),
            },
            parser: RainforestParser::new(config.validation.identifier_policy),
        })
    }

    fn query<'a>(&'a self, api_key: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("api_key", api_key),
            ("type", "search"),
            ("amazon_domain", self.request.amazon_domain.as_str()),
            ("search_term", self.request.search_term.as_str()),
            ("output", "json"),
        ]
    }
}

#[async_trait::async_trait]
impl DealSource for RainforestSource {
    async fn fetch(&self) -> Result<Vec<RawDeal>, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        debug!("GET {} (search_term={:?})", self.api_url, self.request.search_term);
        let response = self
            .client
            .get(&self.api_url)
            .query(&self.query(api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Rainforest API responded [{}]", status);
            return Err(FetchError::InvalidResponse(status.as_u16()));
        }

        let body = response.text().await?;
        let deals = self.parser.parse(&body, Utc::now())?;
        info!("Rainforest returned {} candidate deals", deals.len());
        Ok(deals)
    }
}
