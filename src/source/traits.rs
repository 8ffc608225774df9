use crate::model::{FetchError, RawDeal};

/// Anything that can produce a batch of raw deals.
#[async_trait::async_trait]
pub trait DealSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawDeal>, FetchError>;
}
