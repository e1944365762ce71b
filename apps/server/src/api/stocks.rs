use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};
use stockpulse_core::errors::Error;
use stockpulse_core::stocks::StockListing;

#[derive(Deserialize)]
struct StocksQuery {
    /// Substring filter on symbol or company name.
    q: Option<String>,
    /// Join current prices onto the listing (slower).
    #[serde(default)]
    prices: bool,
}

async fn list_stocks(
    Query(query): Query<StocksQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<StockListing>>> {
    let stocks = match query.q {
        Some(q) if !q.trim().is_empty() => state.stock_service.search(q.trim()).await?,
        _ => state.stock_service.get_all(query.prices).await?,
    };
    Ok(Json(stocks))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchPriceRequest {
    symbols: Vec<String>,
}

/// Batch current prices, keyed by symbol. Symbols the provider can't price
/// are simply absent from the map.
async fn current_prices_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BatchPriceRequest>,
) -> ApiResult<Json<HashMap<String, f64>>> {
    let quotes = state.market_data.get_latest_quotes(&body.symbols).await;
    let prices = quotes
        .into_iter()
        .filter_map(|(symbol, quote)| quote.close.to_f64().map(|price| (symbol, price)))
        .collect();
    Ok(Json(prices))
}

#[derive(Deserialize)]
struct HistoricalQuery {
    date: NaiveDate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoricalPrice {
    symbol: String,
    date: NaiveDate,
    price: f64,
}

async fn historical_price(
    Path(symbol): Path<String>,
    Query(query): Query<HistoricalQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HistoricalPrice>> {
    let quote = state
        .market_data
        .get_historical_close(&symbol, query.date)
        .await
        .map_err(Error::MarketData)?;
    let price = quote.close.to_f64().ok_or_else(|| {
        Error::Unexpected(format!("unrepresentable close price for {}", symbol))
    })?;
    Ok(Json(HistoricalPrice {
        symbol,
        date: query.date,
        price,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stock-price/current/batch", post(current_prices_batch))
        .route("/stock-price/historical/{symbol}", get(historical_price))
}
