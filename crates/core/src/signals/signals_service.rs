use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use num_traits::ToPrimitive;

use crate::errors::Result;
use stockpulse_market_data::MarketDataProvider;

use super::composite::{weighted_series, SourceWeights};
use super::signals_model::{
    CompositePoint, SentimentPeriod, SentimentSignal, SignalSource, SignalSummary,
};
use super::signals_traits::{SignalFeedTrait, SignalServiceTrait};

/// Service joining the signal feeds with current market prices.
pub struct SignalService {
    feed: Arc<dyn SignalFeedTrait>,
    market_data: Arc<dyn MarketDataProvider>,
}

impl SignalService {
    pub fn new(feed: Arc<dyn SignalFeedTrait>, market_data: Arc<dyn MarketDataProvider>) -> Self {
        Self { feed, market_data }
    }

    /// Batch-fetch current prices for the distinct symbols in a signal list.
    async fn current_prices(&self, signals: &[SentimentSignal]) -> HashMap<String, f64> {
        let mut symbols: Vec<String> = signals.iter().map(|s| s.symbol.clone()).collect();
        symbols.sort();
        symbols.dedup();

        self.market_data
            .get_latest_quotes(&symbols)
            .await
            .into_iter()
            .filter_map(|(symbol, quote)| quote.close.to_f64().map(|price| (symbol, price)))
            .collect()
    }
}

#[async_trait]
impl SignalServiceTrait for SignalService {
    async fn get_signals(&self, source: SignalSource) -> Result<Vec<SentimentSignal>> {
        self.feed.fetch_signals(source).await
    }

    async fn get_summary(&self, source: SignalSource) -> Result<SignalSummary> {
        let signals = self.feed.fetch_signals(source).await?;
        let prices = self.current_prices(&signals).await;
        debug!(
            "Computed {} summary over {} signals / {} priced symbols",
            source,
            signals.len(),
            prices.len()
        );
        Ok(SignalSummary::compute(&signals, &prices))
    }

    async fn get_composite_series(
        &self,
        period: SentimentPeriod,
        weights: SourceWeights,
    ) -> Result<Vec<CompositePoint>> {
        let points = self.feed.fetch_sentiment_series(period).await?;
        Ok(weighted_series(points, &weights))
    }
}
