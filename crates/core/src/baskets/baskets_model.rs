//! Basket domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::allocation::Position;
use crate::signals::SourceWeights;

/// A named, user-owned collection of positions.
///
/// The basket-level lock is a persistence concept: a locked basket rejects
/// every edit and its `locked_at` timestamp anchors performance tracking.
/// It is orthogonal to the per-position lock used during weight editing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    pub id: String,
    pub name: String,
    pub source_weights: SourceWeights,
    pub is_locked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub locked_at: Option<NaiveDateTime>,
}

/// One persisted position. Allocations are committed integers; fractional
/// weights never reach storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasketPosition {
    pub id: String,
    pub basket_id: String,
    pub symbol: String,
    pub name: String,
    pub allocation: i32,
    pub is_locked: bool,
}

/// Input model for creating a new basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBasket {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub source_weights: SourceWeights,
}

/// Input model for updating basket metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketUpdate {
    pub id: String,
    pub name: String,
    pub source_weights: SourceWeights,
}

/// A position as submitted by the allocation editor: fractional weight,
/// not yet committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInput {
    pub symbol: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub locked: bool,
}

impl From<PositionInput> for Position {
    fn from(input: PositionInput) -> Self {
        Position {
            id: input.symbol,
            label: input.name,
            weight: input.weight,
            locked: input.locked,
        }
    }
}

/// A committed position ready for insertion; the repository mints the row id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBasketPosition {
    pub symbol: String,
    pub name: String,
    pub allocation: i32,
    pub is_locked: bool,
}

/// A basket together with its position list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BasketWithPositions {
    pub basket: Basket,
    pub positions: Vec<BasketPosition>,
}
