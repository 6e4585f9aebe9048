use std::sync::Mutex;

use async_trait::async_trait;

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{Interval, Lookback, UpstreamBar};

/// Canned provider for tests. Records every call it receives.
pub struct StubProvider {
    result: Result<Vec<UpstreamBar>, PriceProviderError>,
    calls: Mutex<Vec<(String, Lookback, Interval)>>,
}

impl StubProvider {
    pub fn returning(bars: Vec<UpstreamBar>) -> Self {
        Self {
            result: Ok(bars),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: PriceProviderError) -> Self {
        Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Lookback, Interval)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<UpstreamBar>, PriceProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), lookback, interval));
        self.result.clone()
    }
}
