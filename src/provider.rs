//! Deal provider: picks mock or live data and returns normalized deals.

use crate::cache::{build_cache, Clock, DealCache, SystemClock};
use crate::config::AppConfig;
use crate::model::{Deal, FetchError, RawDeal};
use crate::normalizer::normalize_all;
use crate::source::{mock_deals, RainforestSource};
use crate::validator::filter_valid;

use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Mock,
    Live,
}

impl SourceMode {
    /// An explicit override wins over the configured flag.
    pub fn resolve(override_live: Option<bool>, config: &AppConfig) -> Self {
        if override_live.unwrap_or(config.use_live_source) {
            SourceMode::Live
        } else {
            SourceMode::Mock
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DealOptions {
    pub use_live_source: Option<bool>,
}

pub struct DealProvider {
    config: Arc<AppConfig>,
    cache: Arc<dyn DealCache>,
    fixtures: Vec<RawDeal>,
}

impl DealProvider {
    pub fn new(config: Arc<AppConfig>, cache: Arc<dyn DealCache>) -> Self {
        Self {
            config,
            cache,
            fixtures: mock_deals(),
        }
    }

    /// Wires the Rainforest source and the configured cache backend.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, FetchError> {
        let source = Arc::new(RainforestSource::from_config(&config)?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let cache = build_cache(&config.cache, source, clock);
        Ok(Self::new(config, cache))
    }

    pub fn with_fixtures(mut self, fixtures: Vec<RawDeal>) -> Self {
        self.fixtures = fixtures;
        self
    }

    /// Returns the current deal list, unsorted. Never fails; upstream trouble
    /// shows up as an empty list.
    pub async fn get_deals(&self, options: DealOptions) -> Vec<Deal> {
        let mode = SourceMode::resolve(options.use_live_source, &self.config);
        let deals = match mode {
            SourceMode::Mock => normalize_all(&self.fixtures, &self.config.affiliate),
            SourceMode::Live => {
                let candidates = self.cache.fetch_raw_deals().await;
                let fetched = candidates.len();
                let valid = filter_valid(candidates, &self.config.validation);
                info!("Live deals: {} fetched, {} valid", fetched, valid.len());
                normalize_all(&valid, &self.config.affiliate)
            }
        };
        info!("Serving {} deals ({:?})", deals.len(), mode);
        deals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCache(Vec<RawDeal>);

    #[async_trait::async_trait]
    impl DealCache for FixedCache {
        async fn fetch_raw_deals(&self) -> Vec<RawDeal> {
            self.0.clone()
        }
    }

    fn candidate(asin: &str) -> RawDeal {
        RawDeal {
            asin: asin.into(),
            title: "Pegboard Kit".into(),
            brand: "Wall Control".into(),
            image_url: "https://m.media-amazon.com/p.jpg".into(),
            current_price: 50.0,
            original_price: 80.0,
            last_updated: "2024-06-01T00:00:00Z".into(),
        }
    }

    fn provider(use_live_source: bool, cached: Vec<RawDeal>) -> DealProvider {
        let config = AppConfig {
            use_live_source,
            ..AppConfig::default()
        };
        DealProvider::new(Arc::new(config), Arc::new(FixedCache(cached)))
    }

    #[test]
    fn override_beats_config() {
        let live = AppConfig {
            use_live_source: true,
            ..AppConfig::default()
        };
        let mock = AppConfig::default();
        assert_eq!(SourceMode::resolve(None, &live), SourceMode::Live);
        assert_eq!(SourceMode::resolve(None, &mock), SourceMode::Mock);
        assert_eq!(SourceMode::resolve(Some(false), &live), SourceMode::Mock);
        assert_eq!(SourceMode::resolve(Some(true), &mock), SourceMode::Live);
    }

    #[tokio::test]
    async fn mock_mode_normalizes_fixtures_without_validation() {
        let deals = provider(false, Vec::new()).get_deals(DealOptions::default()).await;
        assert_eq!(deals.len(), 5);
        // fixture identifiers are short and would fail validation
        assert_eq!(deals[0].asin, "B07P1");
        assert!((deals[0].amount_off - 70.0).abs() < 1e-9);
        assert_eq!(deals[0].percent_off, 32);
        for deal in &deals {
            let expected = ((deal.original_price - deal.current_price) / deal.original_price * 100.0).round();
            assert_eq!(deal.percent_off as f64, expected);
        }
    }

    #[tokio::test]
    async fn live_mode_validates_cached_records() {
        let deals = provider(true, vec![candidate("short1"), candidate("B0123ABCDE")])
            .get_deals(DealOptions::default())
            .await;
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].asin, "B0123ABCDE");
        assert_eq!(deals[0].percent_off, 38);
    }

    #[tokio::test]
    async fn explicit_override_switches_source() {
        let provider = provider(true, vec![candidate("B0123ABCDE")]);
        let mock = provider
            .get_deals(DealOptions { use_live_source: Some(false) })
            .await;
        assert_eq!(mock.len(), 5);
    }

    #[tokio::test]
    async fn custom_fixtures_replace_defaults() {
        let deals = provider(false, Vec::new())
            .with_fixtures(vec![candidate("anything")])
            .get_deals(DealOptions::default())
            .await;
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].asin, "anything");
    }
}
