use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Interval, Lookback, UpstreamBar};

#[derive(Debug, Clone, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no data found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human readable source name, shown in the response metadata.
    fn name(&self) -> &str;

    /// One request, no retries. An empty `Vec` means the source had no rows.
    async fn fetch_bars(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<UpstreamBar>, PriceProviderError>;
}
