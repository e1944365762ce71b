use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{error::ApiResult, main_lib::AppState};
use stockpulse_core::performance::PortfolioSummary;

async fn portfolio_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PortfolioSummary>> {
    let summary = state.performance_service.get_portfolio_summary().await?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/portfolio/summary", get(portfolio_summary))
}
