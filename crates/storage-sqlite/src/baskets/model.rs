//! Database models for baskets.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use stockpulse_core::baskets::{Basket, BasketPosition};
use stockpulse_core::signals::SourceWeights;

/// Database model for baskets. Source weights are stored as a JSON text
/// column; an unreadable blob falls back to the default blend with a
/// warning rather than making the whole basket unreadable.
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::baskets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BasketDB {
    pub id: String,
    pub name: String,
    pub source_weights: String,
    pub is_locked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub locked_at: Option<NaiveDateTime>,
}

/// Database model for basket positions. `sort_order` preserves the
/// editor's list order, which the allocation operations depend on.
#[derive(
    Insertable,
    Queryable,
    Identifiable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(BasketDB, foreign_key = basket_id))]
#[diesel(table_name = crate::schema::basket_positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BasketPositionDB {
    pub id: String,
    pub basket_id: String,
    pub symbol: String,
    pub name: String,
    pub allocation: i32,
    pub is_locked: bool,
    pub sort_order: i32,
}

/// Insertable row for a new position.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::basket_positions)]
#[serde(rename_all = "camelCase")]
pub struct NewBasketPositionDB {
    pub id: String,
    pub basket_id: String,
    pub symbol: String,
    pub name: String,
    pub allocation: i32,
    pub is_locked: bool,
    pub sort_order: i32,
}

// Conversion to domain models

impl From<BasketDB> for Basket {
    fn from(db: BasketDB) -> Self {
        let source_weights = serde_json::from_str::<SourceWeights>(&db.source_weights)
            .unwrap_or_else(|e| {
                warn!(
                    "Basket {} has unreadable source weights ({}); using defaults",
                    db.id, e
                );
                SourceWeights::default()
            });
        Self {
            id: db.id,
            name: db.name,
            source_weights,
            is_locked: db.is_locked,
            created_at: db.created_at,
            updated_at: db.updated_at,
            locked_at: db.locked_at,
        }
    }
}

impl From<BasketPositionDB> for BasketPosition {
    fn from(db: BasketPositionDB) -> Self {
        Self {
            id: db.id,
            basket_id: db.basket_id,
            symbol: db.symbol,
            name: db.name,
            allocation: db.allocation,
            is_locked: db.is_locked,
        }
    }
}
