use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{LegacyResponse, MarketDataParams};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get_market_data", get(get_market_data))
}

/// GET /get_market_data?symbol=<SYM>&interval=<KEY>&assetType=<TYPE>
pub async fn get_market_data(
    State(state): State<AppState>,
    params: Result<Query<MarketDataParams>, QueryRejection>,
) -> Result<Json<LegacyResponse>, AppError> {
    let Query(params) = params.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    info!(
        "GET /get_market_data - symbol={:?} interval={} assetType={}",
        params.symbol, params.interval, params.asset_type
    );

    let response = services::market_data_service::get_market_data(
        state.price_provider.as_ref(),
        state.lookback_policy,
        &params,
    ).await
        .map_err(|e| {
            match &e {
                AppError::Validation(msg) => warn!("Rejected market data request: {}", msg),
                AppError::NotFound(msg) => warn!("{}", msg),
                AppError::Upstream(msg) => error!("Failed to get market data for {:?}: {}", params.symbol, msg),
            }
            e
        })?;

    info!(
        "Returning {} bars for {}",
        response.time_series.len(),
        response.meta_data.symbol
    );
    Ok(Json(response))
}
