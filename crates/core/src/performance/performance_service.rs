//! Service computing basket performance from lock date to now.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use num_traits::ToPrimitive;

use crate::baskets::BasketRepositoryTrait;
use crate::constants::{BASE_INVESTMENT, TOTAL_ALLOCATION};
use crate::errors::Result;
use stockpulse_market_data::MarketDataProvider;

use super::performance_model::{BasketPerformance, PortfolioSummary};

/// Trait for performance service operations.
#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Performance of every locked basket plus the portfolio aggregate.
    ///
    /// Only locked baskets participate - without a lock date there is no
    /// entry point to measure from.
    async fn get_portfolio_summary(&self) -> Result<PortfolioSummary>;
}

/// Values each basket as a notional investment split by allocation: a
/// position's initial value uses the daily close at the lock date, its
/// current value the latest quote. Symbols whose prices cannot be fetched
/// are skipped rather than failing the whole summary.
pub struct PerformanceService {
    baskets: Arc<dyn BasketRepositoryTrait>,
    market_data: Arc<dyn MarketDataProvider>,
}

impl PerformanceService {
    pub fn new(
        baskets: Arc<dyn BasketRepositoryTrait>,
        market_data: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            baskets,
            market_data,
        }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn get_portfolio_summary(&self) -> Result<PortfolioSummary> {
        let baskets = self.baskets.list_baskets()?;
        let mut summary = PortfolioSummary::default();

        for basket in baskets {
            if !basket.is_locked {
                continue;
            }
            let Some(locked_at) = basket.locked_at else {
                continue;
            };

            let with_positions = match self.baskets.get_basket(&basket.id) {
                Ok(b) => b,
                Err(e) => {
                    warn!("Skipping basket '{}': {}", basket.name, e);
                    continue;
                }
            };

            let mut initial_value = 0.0;
            let mut current_value = 0.0;

            for position in &with_positions.positions {
                let fraction = position.allocation as f64 / TOTAL_ALLOCATION;

                let historical = match self
                    .market_data
                    .get_historical_close(&position.symbol, locked_at.date())
                    .await
                {
                    Ok(quote) => quote,
                    Err(e) => {
                        warn!(
                            "Skipping {} in '{}': no close at lock date: {}",
                            position.symbol, basket.name, e
                        );
                        continue;
                    }
                };
                let current = match self.market_data.get_latest_quote(&position.symbol).await {
                    Ok(quote) => quote,
                    Err(e) => {
                        warn!(
                            "Skipping {} in '{}': no current price: {}",
                            position.symbol, basket.name, e
                        );
                        continue;
                    }
                };

                let (Some(historical_price), Some(current_price)) =
                    (historical.close.to_f64(), current.close.to_f64())
                else {
                    continue;
                };

                initial_value += historical_price * fraction * BASE_INVESTMENT;
                current_value += current_price * fraction * BASE_INVESTMENT;
            }

            let pnl = current_value - initial_value;
            let pnl_percent = if initial_value > 0.0 {
                pnl / initial_value * 100.0
            } else {
                0.0
            };

            debug!(
                "Basket '{}' performance: {:.2} -> {:.2}",
                basket.name, initial_value, current_value
            );

            summary.total_value += current_value;
            summary.total_cost += initial_value;
            summary.baskets_count += 1;
            summary.total_stocks += with_positions.positions.len();
            summary.baskets.push(BasketPerformance {
                basket_id: basket.id,
                basket_name: basket.name,
                lock_date: locked_at,
                stock_count: with_positions.positions.len(),
                initial_value,
                current_value,
                pnl,
                pnl_percent,
            });
        }

        summary.total_pnl = summary.total_value - summary.total_cost;
        summary.total_pnl_percent = if summary.total_cost > 0.0 {
            summary.total_pnl / summary.total_cost * 100.0
        } else {
            0.0
        };

        Ok(summary)
    }
}
