use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::STOCK_LIST_CACHE_SECS;
use crate::errors::Result;
use stockpulse_market_data::MarketDataProvider;

use super::csv_loader::load_stock_list;
use super::stocks_model::StockListing;

/// Trait for stock list service operations.
#[async_trait]
pub trait StockListServiceTrait: Send + Sync {
    /// The full stock universe, optionally enriched with current prices.
    async fn get_all(&self, include_prices: bool) -> Result<Vec<StockListing>>;

    /// Substring search on symbol or company name (no prices - fast path).
    async fn search(&self, query: &str) -> Result<Vec<StockListing>>;

    async fn get_by_symbol(&self, symbol: &str) -> Result<Option<StockListing>>;

    /// Drop the cached list, forcing a re-read on the next call.
    fn clear_cache(&self);
}

struct CachedList {
    loaded_at: Instant,
    stocks: Vec<StockListing>,
}

/// CSV-backed stock list with a short-lived in-memory cache.
pub struct StockListService {
    csv_path: PathBuf,
    market_data: Arc<dyn MarketDataProvider>,
    cache: RwLock<Option<CachedList>>,
}

impl StockListService {
    pub fn new(csv_path: impl Into<PathBuf>, market_data: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            csv_path: csv_path.into(),
            market_data,
            cache: RwLock::new(None),
        }
    }

    /// Cached listing when fresh, otherwise a fresh parse of the file.
    fn load_cached(&self) -> Result<Vec<StockListing>> {
        let ttl = Duration::from_secs(STOCK_LIST_CACHE_SECS);
        {
            let cache = self.cache.read().unwrap();
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < ttl {
                    return Ok(cached.stocks.clone());
                }
            }
        }

        let stocks = load_stock_list(&self.csv_path)?;
        debug!("Loaded {} stocks from {}", stocks.len(), self.csv_path.display());
        *self.cache.write().unwrap() = Some(CachedList {
            loaded_at: Instant::now(),
            stocks: stocks.clone(),
        });
        Ok(stocks)
    }

    fn change_percent(open: Option<Decimal>, close: Decimal) -> Option<f64> {
        let open = open?;
        if open.is_zero() {
            return None;
        }
        ((close - open) / open * Decimal::ONE_HUNDRED).to_f64()
    }
}

#[async_trait]
impl StockListServiceTrait for StockListService {
    async fn get_all(&self, include_prices: bool) -> Result<Vec<StockListing>> {
        let mut stocks = self.load_cached()?;
        if !include_prices || stocks.is_empty() {
            return Ok(stocks);
        }

        let symbols: Vec<String> = stocks.iter().map(|s| s.symbol.clone()).collect();
        let quotes = self.market_data.get_latest_quotes(&symbols).await;
        for stock in &mut stocks {
            if let Some(quote) = quotes.get(&stock.symbol) {
                stock.price = quote.close.to_f64();
                stock.change = Self::change_percent(quote.open, quote.close);
            }
        }
        Ok(stocks)
    }

    async fn search(&self, query: &str) -> Result<Vec<StockListing>> {
        let stocks = self.load_cached()?;
        Ok(stocks.into_iter().filter(|s| s.matches(query)).collect())
    }

    async fn get_by_symbol(&self, symbol: &str) -> Result<Option<StockListing>> {
        let stocks = self.load_cached()?;
        Ok(stocks.into_iter().find(|s| s.symbol == symbol))
    }

    fn clear_cache(&self) {
        *self.cache.write().unwrap() = None;
    }
}
