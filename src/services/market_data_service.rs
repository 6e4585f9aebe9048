use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{
    AssetType, Interval, LegacyResponse, LookbackPolicy, MarketDataParams, PriceBar, UpstreamBar,
};

/// Validate the request, fetch once from upstream and reshape the rows into
/// the legacy payload.
///
/// Validation failures return before any upstream call is made.
pub async fn get_market_data(
    provider: &dyn PriceProvider,
    policy: LookbackPolicy,
    params: &MarketDataParams,
) -> Result<LegacyResponse, AppError> {
    let symbol = params
        .symbol
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Stock symbol parameter is required.".to_string()))?;

    let interval = Interval::from_key(&params.interval)
        .ok_or_else(|| AppError::Validation(format!("Invalid interval: {}", params.interval)))?;

    let symbol = AssetType::parse(&params.asset_type).upstream_symbol(symbol);
    let lookback = policy.lookback_for(interval);

    let upstream = match provider.fetch_bars(&symbol, lookback, interval).await {
        Ok(bars) => bars,
        Err(PriceProviderError::NotFound) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if upstream.is_empty() {
        return Err(AppError::NotFound(format!(
            "No data found for symbol {} with interval {}. It might be a delisted ticker or an invalid interval for this period.",
            symbol,
            interval.upstream_code()
        )));
    }

    let bars = normalize_bars(upstream);
    Ok(LegacyResponse::new(interval.key(), provider.name(), &symbol, &bars))
}

/// Convert every row to UTC exactly once, then order them oldest first.
pub fn normalize_bars(upstream: Vec<UpstreamBar>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = upstream.into_iter().map(PriceBar::from).collect();
    bars.sort_by_key(|bar| bar.timestamp);
    bars
}
