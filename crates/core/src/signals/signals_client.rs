//! HTTP client for the upstream signal feeds.
//!
//! The three feeds share one base URL and a common row shape; only the
//! "what was analyzed" column differs per source (articles, keywords,
//! posts). Rows that fail to parse are skipped with a warning rather than
//! failing the whole list.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::errors::Result;

use super::signals_model::{
    SentimentLabel, SentimentPeriod, SentimentPoint, SentimentSignal, SignalError, SignalSource,
};
use super::signals_traits::SignalFeedTrait;

/// One row as the feeds serve it. Some deployments send numeric fields as
/// strings, so scores and prices are parsed leniently.
#[derive(Debug, Deserialize)]
struct SignalRow {
    date: String,
    comp_symbol: String,
    #[serde(default)]
    analyzed_articles: Option<String>,
    #[serde(default)]
    analyzed_keywords: Option<String>,
    #[serde(default)]
    analyzed_posts: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    sentiment_score: f64,
    sentiment: String,
    #[serde(deserialize_with = "lenient_f64")]
    entry_price: f64,
}

/// Row of the daily sentiment series endpoint.
#[derive(Debug, Deserialize)]
struct SeriesRow {
    date: String,
    #[serde(rename = "twitterSentiment", deserialize_with = "lenient_f64")]
    twitter: f64,
    #[serde(rename = "googleTrendsSentiment", deserialize_with = "lenient_f64")]
    google_trends: f64,
    #[serde(rename = "newsSentiment", deserialize_with = "lenient_f64")]
    news: f64,
}

/// Accept a JSON number or a numeric string.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Parse the feed's date column: full RFC 3339 timestamps or bare dates.
fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}

/// Signal feed client over HTTP.
pub struct SignalFeedClient {
    client: Client,
    base_url: String,
}

impl SignalFeedClient {
    /// Create a client for the feed service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching signal feed {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SignalError::from)?;

        if !response.status().is_success() {
            return Err(SignalError::Status {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        Ok(response.json::<T>().await.map_err(SignalError::from)?)
    }

    fn row_to_signal(source: SignalSource, row: SignalRow) -> Option<SentimentSignal> {
        let Some(date) = parse_feed_date(&row.date) else {
            warn!(
                "Skipping {} signal for {}: unparseable date '{}'",
                source, row.comp_symbol, row.date
            );
            return None;
        };

        let detail = row
            .analyzed_articles
            .or(row.analyzed_keywords)
            .or(row.analyzed_posts)
            .unwrap_or_default();

        let sentiment = SentimentLabel::parse(&row.sentiment)
            .unwrap_or_else(|| SentimentLabel::from_score(row.sentiment_score));

        Some(SentimentSignal {
            date,
            symbol: row.comp_symbol,
            detail,
            sentiment_score: row.sentiment_score,
            sentiment,
            entry_price: row.entry_price,
        })
    }
}

#[async_trait]
impl SignalFeedTrait for SignalFeedClient {
    async fn fetch_signals(&self, source: SignalSource) -> Result<Vec<SentimentSignal>> {
        let rows: Vec<SignalRow> = self.get_json(source.feed_path()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| Self::row_to_signal(source, row))
            .collect())
    }

    async fn fetch_sentiment_series(
        &self,
        period: SentimentPeriod,
    ) -> Result<Vec<SentimentPoint>> {
        let path = format!("sentiment-series?period={}", period.as_str());
        let rows: Vec<SeriesRow> = self.get_json(&path).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let Some(date) = parse_feed_date(&row.date) else {
                    warn!("Skipping sentiment point: unparseable date '{}'", row.date);
                    return None;
                };
                Some(SentimentPoint {
                    date,
                    twitter: row.twitter,
                    google_trends: row.google_trends,
                    news: row.news,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_date_accepts_both_shapes() {
        assert_eq!(
            parse_feed_date("2025-07-01T14:30:00Z"),
            NaiveDate::from_ymd_opt(2025, 7, 1)
        );
        assert_eq!(
            parse_feed_date("2025-07-01"),
            NaiveDate::from_ymd_opt(2025, 7, 1)
        );
        assert_eq!(parse_feed_date("yesterday"), None);
    }

    #[test]
    fn test_signal_row_parses_stringly_typed_numbers() {
        let row: SignalRow = serde_json::from_str(
            r#"{
                "date": "2025-07-01",
                "comp_symbol": "AAPL",
                "analyzed_articles": "Apple beats earnings; iPhone demand strong",
                "sentiment_score": "0.62",
                "sentiment": "Positive",
                "entry_price": "175.43"
            }"#,
        )
        .unwrap();

        let signal = SignalFeedClient::row_to_signal(SignalSource::News, row).unwrap();
        assert_eq!(signal.symbol, "AAPL");
        assert_eq!(signal.sentiment, SentimentLabel::Positive);
        assert!((signal.entry_price - 175.43).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_label_falls_back_to_score() {
        let row: SignalRow = serde_json::from_str(
            r#"{
                "date": "2025-07-01",
                "comp_symbol": "TSLA",
                "analyzed_keywords": "tesla recall",
                "sentiment_score": -0.55,
                "sentiment": "bearish??",
                "entry_price": 251.82
            }"#,
        )
        .unwrap();

        let signal = SignalFeedClient::row_to_signal(SignalSource::GoogleTrends, row).unwrap();
        assert_eq!(signal.sentiment, SentimentLabel::Negative);
    }
}
