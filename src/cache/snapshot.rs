//! Single-file snapshot cache that survives restarts.
//!
//! The file holds the last successful upstream fetch. Reads are permissive:
//! a missing, unreadable or malformed file is a cache miss, never an error.
//! A failed refresh leaves the existing file alone.

use crate::cache::clock::{is_within_window, Clock};
use crate::cache::DealCache;
use crate::model::{CacheError, RawDeal};
use crate::source::DealSource;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What is written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub deals: Vec<RawDeal>,
}

/// Accepted on-disk shapes. A bare array takes its timestamp from the file mtime.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Stamped(CacheSnapshot),
    Bare(Vec<RawDeal>),
}

pub struct SnapshotDealCache {
    source: Arc<dyn DealSource>,
    path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    refresh: Mutex<()>,
}

impl SnapshotDealCache {
    pub fn new(
        source: Arc<dyn DealSource>,
        path: impl Into<PathBuf>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            path: path.into(),
            ttl,
            clock,
            refresh: Mutex::new(()),
        }
    }

    /// Reads the snapshot, treating every failure as "no cache".
    pub async fn load(&self) -> Option<CacheSnapshot> {
        match self.read_snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!("No usable snapshot at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn read_snapshot(&self) -> Result<CacheSnapshot, CacheError> {
        let bytes = fs::read(&self.path).await?;
        match serde_json::from_slice::<SnapshotFile>(&bytes)? {
            SnapshotFile::Stamped(snapshot) => Ok(snapshot),
            SnapshotFile::Bare(deals) => {
                let modified = fs::metadata(&self.path).await?.modified()?;
                Ok(CacheSnapshot {
                    fetched_at: DateTime::<Utc>::from(modified),
                    deals,
                })
            }
        }
    }

    /// Writes through a temporary file so readers never see a half-written snapshot.
    pub async fn store(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(snapshot)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn is_fresh(&self, snapshot: &CacheSnapshot) -> bool {
        is_within_window(self.clock.now() - snapshot.fetched_at, self.ttl)
    }
}

#[async_trait::async_trait]
impl DealCache for SnapshotDealCache {
    async fn fetch_raw_deals(&self) -> Vec<RawDeal> {
        let _refresh = self.refresh.lock().await;

        if let Some(snapshot) = self.load().await.filter(|s| self.is_fresh(s)) {
            debug!(
                "Serving snapshot from {} ({} deals)",
                snapshot.fetched_at,
                snapshot.deals.len()
            );
            return snapshot.deals;
        }

        match self.source.fetch().await {
            Ok(deals) => {
                let snapshot = CacheSnapshot {
                    fetched_at: self.clock.now(),
                    deals,
                };
                match self.store(&snapshot).await {
                    Ok(()) => info!(
                        "Saved snapshot with {} deals to {}",
                        snapshot.deals.len(),
                        self.path.display()
                    ),
                    Err(e) => warn!("Failed to write snapshot {}: {}", self.path.display(), e),
                }
                snapshot.deals
            }
            Err(e) => {
                warn!("Upstream fetch failed, keeping existing snapshot: {}", e);
                Vec::new()
            }
        }
    }
}
