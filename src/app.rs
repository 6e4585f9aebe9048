use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{health, market_data};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The endpoint is public; any origin may call it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .merge(market_data::router())
        .layer(cors)
        .with_state(state)
}
