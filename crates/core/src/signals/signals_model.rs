//! Signal domain models.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three independent sentiment sources feeding the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalSource {
    Twitter,
    GoogleTrends,
    News,
}

impl SignalSource {
    pub const ALL: [SignalSource; 3] = [
        SignalSource::Twitter,
        SignalSource::GoogleTrends,
        SignalSource::News,
    ];

    /// Path segment of the upstream feed endpoint for this source.
    pub fn feed_path(&self) -> &'static str {
        match self {
            SignalSource::Twitter => "twitter-signals",
            SignalSource::GoogleTrends => "gtrend-signals",
            SignalSource::News => "news-signals",
        }
    }
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalSource::Twitter => "twitter",
            SignalSource::GoogleTrends => "googleTrends",
            SignalSource::News => "news",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SignalSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(SignalSource::Twitter),
            "googleTrends" | "google-trends" | "gtrends" | "gtrend" => {
                Ok(SignalSource::GoogleTrends)
            }
            "news" => Ok(SignalSource::News),
            other => Err(format!("unknown signal source '{}'", other)),
        }
    }
}

/// Per-signal sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify a raw score: above 0.3 positive, down to -0.3 neutral,
    /// below that negative.
    pub fn from_score(score: f64) -> Self {
        if score > 0.3 {
            SentimentLabel::Positive
        } else if score >= -0.3 {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Negative
        }
    }

    /// Case-insensitive parse of the label strings the feeds emit.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

/// Headline classification of the latest composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverallSentiment {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl OverallSentiment {
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            OverallSentiment::VeryPositive
        } else if score > 0.2 {
            OverallSentiment::Positive
        } else if score > -0.2 {
            OverallSentiment::Neutral
        } else if score > -0.5 {
            OverallSentiment::Negative
        } else {
            OverallSentiment::VeryNegative
        }
    }
}

impl fmt::Display for OverallSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            OverallSentiment::VeryPositive => "Very Positive",
            OverallSentiment::Positive => "Positive",
            OverallSentiment::Neutral => "Neutral",
            OverallSentiment::Negative => "Negative",
            OverallSentiment::VeryNegative => "Very Negative",
        };
        write!(f, "{}", text)
    }
}

/// One row of a signal feed: a symbol's sentiment reading plus the price
/// at which the signal was taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSignal {
    pub date: NaiveDate,
    pub symbol: String,
    /// What the source analyzed: article titles for news, keywords for
    /// trends, post text for twitter.
    pub detail: String,
    pub sentiment_score: f64,
    pub sentiment: SentimentLabel,
    pub entry_price: f64,
}

/// Aggregate stats for one source's signal list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SignalSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub last_update: Option<NaiveDate>,
}

impl SignalSummary {
    /// Compute summary stats for a signal list against current prices.
    ///
    /// A positive signal wins when the price held at or above its entry, a
    /// negative signal wins when it held at or below. Neutral signals and
    /// signals with a zero entry price never count as decided trades, and
    /// symbols without a current price are left undecided.
    pub fn compute(signals: &[SentimentSignal], prices: &HashMap<String, f64>) -> Self {
        let mut summary = SignalSummary {
            total: signals.len(),
            positive: 0,
            negative: 0,
            neutral: 0,
            wins: 0,
            losses: 0,
            win_rate: 0.0,
            last_update: signals.iter().map(|s| s.date).max(),
        };

        for signal in signals {
            match signal.sentiment {
                SentimentLabel::Positive => summary.positive += 1,
                SentimentLabel::Negative => summary.negative += 1,
                SentimentLabel::Neutral => summary.neutral += 1,
            }

            if signal.entry_price == 0.0 {
                continue;
            }
            let Some(&current) = prices.get(&signal.symbol) else {
                continue;
            };

            let won = match signal.sentiment {
                SentimentLabel::Positive => current >= signal.entry_price,
                SentimentLabel::Negative => current <= signal.entry_price,
                SentimentLabel::Neutral => continue,
            };
            if won {
                summary.wins += 1;
            } else {
                summary.losses += 1;
            }
        }

        let decided = summary.wins + summary.losses;
        if decided > 0 {
            summary.win_rate = summary.wins as f64 / decided as f64 * 100.0;
        }
        summary
    }
}

/// Time window for the composite sentiment series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentPeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
}

impl SentimentPeriod {
    pub fn days(&self) -> u32 {
        match self {
            SentimentPeriod::OneDay => 1,
            SentimentPeriod::OneWeek => 7,
            SentimentPeriod::OneMonth => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentPeriod::OneDay => "1d",
            SentimentPeriod::OneWeek => "1w",
            SentimentPeriod::OneMonth => "1m",
        }
    }
}

impl FromStr for SentimentPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(SentimentPeriod::OneDay),
            "1w" => Ok(SentimentPeriod::OneWeek),
            "1m" => Ok(SentimentPeriod::OneMonth),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

/// One day of per-source sentiment scores, before weighting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentPoint {
    pub date: NaiveDate,
    pub twitter: f64,
    pub google_trends: f64,
    pub news: f64,
}

/// A sentiment point with its weighted composite score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositePoint {
    pub date: NaiveDate,
    pub twitter: f64,
    pub google_trends: f64,
    pub news: f64,
    pub composite: f64,
}

/// Errors from the signal feed layer.
#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Signal feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Signal feed returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed signal payload: {0}")]
    Malformed(String),
}
