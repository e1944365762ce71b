//! REST API routers, one file per resource, mounted under `/api`.

mod allocations;
mod baskets;
mod health;
mod portfolio;
mod signals;
mod stocks;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(baskets::router())
        .merge(allocations::router())
        .merge(signals::router())
        .merge(stocks::router())
        .merge(portfolio::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
