//! Market data provider trait definitions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Symbols are plain ticker strings ("AAPL", "MSFT") - the canonical
/// identifier used throughout the application.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO".
    /// Used for logging and quote source attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch the latest quotes for a batch of symbols.
    ///
    /// Per-symbol failures are logged and dropped rather than failing the
    /// whole batch; callers decide how to handle missing entries.
    async fn get_latest_quotes(&self, symbols: &[String]) -> HashMap<String, Quote> {
        let mut quotes = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            match self.get_latest_quote(symbol).await {
                Ok(quote) => {
                    quotes.insert(symbol.clone(), quote);
                }
                Err(e) => {
                    warn!("Skipping latest quote for {}: {}", symbol, e);
                }
            }
        }
        quotes
    }

    /// Fetch the daily close for a symbol on a specific date.
    ///
    /// # Returns
    ///
    /// The first quote of that trading day, or `NoDataForRange` when the
    /// market was closed and no bar exists for the date.
    async fn get_historical_close(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Quote, MarketDataError>;
}
