// Cache layer: wraps the upstream source with a validity window.

pub mod clock;
pub mod memory;
pub mod snapshot;

pub use clock::{Clock, SystemClock};
pub use memory::{MemoryDealCache, TimedCache};
pub use snapshot::{CacheSnapshot, SnapshotDealCache};

use crate::config::{CacheBackend, CacheConfig};
use crate::model::RawDeal;
use crate::source::DealSource;
use std::sync::Arc;

/// Returns raw deals, cached or freshly fetched. Never fails: upstream
/// problems come back as an empty list.
#[async_trait::async_trait]
pub trait DealCache: Send + Sync {
    async fn fetch_raw_deals(&self) -> Vec<RawDeal>;
}

/// Picks the backend named in `config`. `config.key` only addresses the
/// memory backend; the snapshot backend's slot is `config.snapshot_path`.
pub fn build_cache(
    config: &CacheConfig,
    source: Arc<dyn DealSource>,
    clock: Arc<dyn Clock>,
) -> Arc<dyn DealCache> {
    let ttl = clock::ttl_from_secs(config.ttl_seconds);
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryDealCache::new(source, config.key.clone(), ttl, clock)),
        CacheBackend::Snapshot => Arc::new(SnapshotDealCache::new(
            source,
            config.snapshot_path.clone(),
            ttl,
            clock,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingSource(AtomicUsize);

    #[async_trait::async_trait]
    impl DealSource for CountingSource {
        async fn fetch(&self) -> Result<Vec<RawDeal>, FetchError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RawDeal {
                asin: "B000000001".into(),
                title: "Shop Vac".into(),
                brand: "Ridgid".into(),
                image_url: "https://m.media-amazon.com/v.jpg".into(),
                current_price: 89.0,
                original_price: 129.0,
                last_updated: "2024-06-01T00:00:00Z".into(),
            }])
        }
    }

    #[tokio::test]
    async fn snapshot_backend_is_addressed_by_path_not_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deals.json");
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));

        let config = CacheConfig {
            backend: CacheBackend::Snapshot,
            key: "first-key".into(),
            ttl_seconds: 3600,
            snapshot_path: path.clone(),
        };
        let first = build_cache(&config, source.clone(), Arc::new(SystemClock));
        assert_eq!(first.fetch_raw_deals().await.len(), 1);
        assert!(path.exists());

        // A different key over the same file sees the same snapshot.
        let renamed = CacheConfig {
            key: "second-key".into(),
            ..config
        };
        let second = build_cache(&renamed, source.clone(), Arc::new(SystemClock));
        assert_eq!(second.fetch_raw_deals().await.len(), 1);
        assert_eq!(source.0.load(Ordering::SeqCst), 1);
    }
}
