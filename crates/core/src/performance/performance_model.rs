//! Performance domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One locked basket's performance since its lock date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasketPerformance {
    pub basket_id: String,
    pub basket_name: String,
    pub lock_date: NaiveDateTime,
    pub stock_count: usize,
    pub initial_value: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// Aggregate performance across all locked baskets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_pnl: f64,
    pub total_pnl_percent: f64,
    pub baskets_count: usize,
    pub total_stocks: usize,
    pub baskets: Vec<BasketPerformance>,
}
