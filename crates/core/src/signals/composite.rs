//! Weighted composite sentiment.
//!
//! The three source weights behave like a miniature allocation basket that
//! sums to 1.0 instead of 100: sources can be locked, and dragging one
//! weight moves the unlocked others proportionally.

use serde::{Deserialize, Serialize};

use crate::constants::{SOURCE_WEIGHT_TOLERANCE, TOTAL_SOURCE_WEIGHT};

use super::signals_model::{CompositePoint, SentimentPoint, SignalSource};

/// Blend weights for the three sentiment sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceWeights {
    pub twitter: f64,
    pub google_trends: f64,
    pub news: f64,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self {
            twitter: 0.4,
            google_trends: 0.3,
            news: 0.3,
        }
    }
}

/// Per-source lock flags for weight editing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeightLocks {
    pub twitter: bool,
    pub google_trends: bool,
    pub news: bool,
}

impl WeightLocks {
    pub fn is_locked(&self, source: SignalSource) -> bool {
        match source {
            SignalSource::Twitter => self.twitter,
            SignalSource::GoogleTrends => self.google_trends,
            SignalSource::News => self.news,
        }
    }
}

impl SourceWeights {
    pub fn get(&self, source: SignalSource) -> f64 {
        match source {
            SignalSource::Twitter => self.twitter,
            SignalSource::GoogleTrends => self.google_trends,
            SignalSource::News => self.news,
        }
    }

    fn set(&mut self, source: SignalSource, value: f64) {
        match source {
            SignalSource::Twitter => self.twitter = value,
            SignalSource::GoogleTrends => self.google_trends = value,
            SignalSource::News => self.news = value,
        }
    }

    pub fn total(&self) -> f64 {
        self.twitter + self.google_trends + self.news
    }

    pub fn is_normalized(&self) -> bool {
        (self.total() - TOTAL_SOURCE_WEIGHT).abs() <= SOURCE_WEIGHT_TOLERANCE
    }

    /// Set one source's weight, keeping the total at 1.0 without moving
    /// locked sources.
    ///
    /// The unlocked others absorb the change proportionally to their
    /// current weights (evenly when those sum to zero); everything is
    /// floored at zero and the residual is normalized onto the first
    /// unlocked other source, or onto the target itself when every other
    /// source is locked.
    pub fn adjust(&mut self, source: SignalSource, value: f64, locks: &WeightLocks) {
        let value = value.max(0.0);

        let others: Vec<SignalSource> = SignalSource::ALL
            .into_iter()
            .filter(|s| *s != source && !locks.is_locked(*s))
            .collect();

        if others.is_empty() {
            // Nothing can move: pin the target to whatever keeps the sum at 1.
            self.set(source, value);
            let sum = self.total();
            if (sum - TOTAL_SOURCE_WEIGHT).abs() > SOURCE_WEIGHT_TOLERANCE {
                self.set(source, value + (TOTAL_SOURCE_WEIGHT - sum));
            }
            return;
        }

        let locked_other_sum: f64 = SignalSource::ALL
            .into_iter()
            .filter(|s| *s != source && locks.is_locked(*s))
            .map(|s| self.get(s))
            .sum();
        let remaining = TOTAL_SOURCE_WEIGHT - value - locked_other_sum;
        let current_other_sum: f64 = others.iter().map(|s| self.get(*s)).sum();

        self.set(source, value);

        if current_other_sum == 0.0 {
            let even = remaining / others.len() as f64;
            for s in &others {
                self.set(*s, even);
            }
        } else {
            for s in &others {
                let proportion = self.get(*s) / current_other_sum;
                self.set(*s, remaining * proportion);
            }
        }

        for s in SignalSource::ALL {
            if !locks.is_locked(s) && self.get(s) < 0.0 {
                self.set(s, 0.0);
            }
        }

        let sum = self.total();
        if sum > 0.0 && (sum - TOTAL_SOURCE_WEIGHT).abs() > SOURCE_WEIGHT_TOLERANCE {
            let absorber = others.first().copied().unwrap_or(source);
            self.set(absorber, self.get(absorber) + TOTAL_SOURCE_WEIGHT - sum);
        }
    }

    /// Weighted blend of one day's per-source scores.
    pub fn composite_score(&self, point: &SentimentPoint) -> f64 {
        point.twitter * self.twitter
            + point.google_trends * self.google_trends
            + point.news * self.news
    }
}

/// Map a per-source series to composite points, rounding the blended score
/// to two decimals for display.
pub fn weighted_series(points: Vec<SentimentPoint>, weights: &SourceWeights) -> Vec<CompositePoint> {
    points
        .into_iter()
        .map(|point| {
            let composite = (weights.composite_score(&point) * 100.0).round() / 100.0;
            CompositePoint {
                date: point.date,
                twitter: point.twitter,
                google_trends: point.google_trends,
                news: point.news,
                composite,
            }
        })
        .collect()
}
