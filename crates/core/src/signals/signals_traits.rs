use async_trait::async_trait;

use crate::errors::Result;

use super::composite::SourceWeights;
use super::signals_model::{
    CompositePoint, SentimentPeriod, SentimentPoint, SentimentSignal, SignalSource, SignalSummary,
};

/// Trait for fetching raw signal data from the upstream feeds.
#[async_trait]
pub trait SignalFeedTrait: Send + Sync {
    /// Fetch the signal list for one source, newest first.
    async fn fetch_signals(&self, source: SignalSource) -> Result<Vec<SentimentSignal>>;

    /// Fetch the daily per-source sentiment series for a period.
    async fn fetch_sentiment_series(
        &self,
        period: SentimentPeriod,
    ) -> Result<Vec<SentimentPoint>>;
}

/// Trait for signal service operations.
#[async_trait]
pub trait SignalServiceTrait: Send + Sync {
    async fn get_signals(&self, source: SignalSource) -> Result<Vec<SentimentSignal>>;

    /// Signal list stats with win rates against current market prices.
    async fn get_summary(&self, source: SignalSource) -> Result<SignalSummary>;

    /// The weighted composite sentiment series for a period.
    async fn get_composite_series(
        &self,
        period: SentimentPeriod,
        weights: SourceWeights,
    ) -> Result<Vec<CompositePoint>>;
}
