mod legacy_response;
mod market_data;
mod price_bar;

pub use legacy_response::LegacyResponse;
pub use market_data::{AssetType, Interval, Lookback, LookbackPolicy, MarketDataParams};
pub use price_bar::{BarTimestamp, PriceBar, UpstreamBar};
