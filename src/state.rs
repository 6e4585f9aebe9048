use std::sync::Arc;

use crate::config::ServerConfig;
use crate::external::price_provider::PriceProvider;
use crate::models::LookbackPolicy;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
    pub lookback_policy: LookbackPolicy,
}

impl AppState {
    pub fn from_config(config: &ServerConfig, price_provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            price_provider,
            lookback_policy: config.lookback_policy(),
        }
    }
}
