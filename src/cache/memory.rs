// In-process keyed cache with a validity window
use crate::cache::clock::{is_within_window, Clock};
use crate::cache::DealCache;
use crate::model::RawDeal;
use crate::source::DealSource;

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

struct Entry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

type Slot<T> = Arc<tokio::sync::Mutex<Option<Entry<T>>>>;

/// Keyed cache where every key holds one value and the time it was stored.
///
/// Each key has its own async lock, so concurrent callers that find the
/// entry expired wait for a single in-flight fetch instead of starting their own.
pub struct TimedCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<String, Slot<T>>>,
}

impl<T: Clone> TimedCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, key: &str) -> Slot<T> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key.to_string()).or_default().clone()
    }

    fn is_fresh(&self, entry: &Entry<T>) -> bool {
        is_within_window(self.clock.now() - entry.stored_at, self.ttl)
    }

    /// Returns the cached value for `key` if still inside the window, otherwise
    /// runs `fetch`, stores its output with a fresh timestamp and returns it.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref().filter(|e| self.is_fresh(e)) {
            debug!("Cache hit for {:?} (stored {})", key, cached.stored_at);
            return cached.value.clone();
        }

        debug!("Cache miss for {:?}", key);
        let value = fetch().await;
        *entry = Some(Entry {
            value: value.clone(),
            stored_at: self.clock.now(),
        });
        value
    }
}

/// Memory-backed deal cache. A failed refresh stores the empty answer, which is
/// then served until the window elapses again.
pub struct MemoryDealCache {
    source: Arc<dyn DealSource>,
    cache: TimedCache<Vec<RawDeal>>,
    key: String,
}

impl MemoryDealCache {
    pub fn new(
        source: Arc<dyn DealSource>,
        key: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            cache: TimedCache::new(ttl, clock),
            key: key.into(),
        }
    }
}

#[async_trait::async_trait]
impl DealCache for MemoryDealCache {
    async fn fetch_raw_deals(&self) -> Vec<RawDeal> {
        self.cache
            .get_or_fetch(&self.key, || async {
                match self.source.fetch().await {
                    Ok(deals) => {
                        info!("Refreshed {:?} with {} deals", self.key, deals.len());
                        deals
                    }
                    Err(e) => {
                        warn!("Upstream fetch for {:?} failed: {}", self.key, e);
                        Vec::new()
                    }
                }
            })
            .await
    }
}
