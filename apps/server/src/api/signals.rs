use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use stockpulse_core::errors::{Error, ValidationError};
use stockpulse_core::signals::{
    CompositePoint, OverallSentiment, SentimentPeriod, SentimentSignal, SignalSource,
    SignalSummary, SourceWeights, WeightLocks,
};

async fn news_signals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<SentimentSignal>>> {
    Ok(Json(state.signal_service.get_signals(SignalSource::News).await?))
}

async fn twitter_signals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SentimentSignal>>> {
    Ok(Json(
        state
            .signal_service
            .get_signals(SignalSource::Twitter)
            .await?,
    ))
}

async fn gtrend_signals(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SentimentSignal>>> {
    Ok(Json(
        state
            .signal_service
            .get_signals(SignalSource::GoogleTrends)
            .await?,
    ))
}

async fn signal_summary(
    Path(source): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SignalSummary>> {
    let source = SignalSource::from_str(&source)
        .map_err(|e| Error::Validation(ValidationError::InvalidInput(e)))?;
    Ok(Json(state.signal_service.get_summary(source).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompositeQuery {
    period: Option<String>,
    twitter: Option<f64>,
    google_trends: Option<f64>,
    news: Option<f64>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CompositeResponse {
    series: Vec<CompositePoint>,
    /// Classification of the latest composite score, if the series is
    /// non-empty.
    overall: Option<OverallSentiment>,
}

async fn composite_series(
    Query(query): Query<CompositeQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompositeResponse>> {
    let period = match query.period.as_deref() {
        Some(raw) => SentimentPeriod::from_str(raw)
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e)))?,
        None => SentimentPeriod::OneWeek,
    };

    let defaults = SourceWeights::default();
    let weights = SourceWeights {
        twitter: query.twitter.unwrap_or(defaults.twitter),
        google_trends: query.google_trends.unwrap_or(defaults.google_trends),
        news: query.news.unwrap_or(defaults.news),
    };
    if !weights.is_normalized() {
        return Err(Error::ConstraintViolation("source weights must sum to 1".to_string()).into());
    }

    let series = state
        .signal_service
        .get_composite_series(period, weights)
        .await?;
    let overall = series
        .last()
        .map(|point| OverallSentiment::from_score(point.composite));
    Ok(Json(CompositeResponse { series, overall }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightPreviewRequest {
    weights: SourceWeights,
    #[serde(default)]
    locks: WeightLocks,
    source: SignalSource,
    value: f64,
}

/// The weight-slider counterpart of the allocation preview: adjust one
/// source's weight and let the unlocked others rebalance to a sum of 1.
async fn weights_preview(
    State(_state): State<Arc<AppState>>,
    Json(body): Json<WeightPreviewRequest>,
) -> ApiResult<Json<SourceWeights>> {
    let mut weights = body.weights;
    weights.adjust(body.source, body.value, &body.locks);
    Ok(Json(weights))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Feed list routes keep the dashboard's historical names.
        .route("/news-signals", get(news_signals))
        .route("/twitter-signals", get(twitter_signals))
        .route("/gtrend-signals", get(gtrend_signals))
        .route("/signals/composite", get(composite_series))
        .route("/signals/weights/preview", axum::routing::post(weights_preview))
        .route("/signals/{source}/summary", get(signal_summary))
}
