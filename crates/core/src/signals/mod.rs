//! Signals module - sentiment signal feeds, win-rate analytics, and the
//! weighted composite sentiment.

mod composite;
mod signals_client;
mod signals_model;
mod signals_service;
mod signals_traits;


pub use composite::{weighted_series, SourceWeights, WeightLocks};
pub use signals_client::SignalFeedClient;
pub use signals_model::{
    CompositePoint, OverallSentiment, SentimentLabel, SentimentPeriod, SentimentPoint,
    SentimentSignal, SignalError, SignalSource, SignalSummary,
};
pub use signals_service::SignalService;
pub use signals_traits::{SignalFeedTrait, SignalServiceTrait};
