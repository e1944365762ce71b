//! Allocation domain models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ALLOCATION_TOLERANCE, TOTAL_ALLOCATION};

/// One stock's weight within a basket being edited.
///
/// The id is the ticker symbol - the one identifier that survives
/// persistence and price lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub label: String,
    /// Percentage weight. Fractional while editing; integers only after commit.
    pub weight: f64,
    /// When true, the weight must not be altered by any redistribution.
    pub locked: bool,
}

impl Position {
    /// A freshly added position: zero weight, unlocked.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            weight: 0.0,
            locked: false,
        }
    }
}

/// Derived validity of a position list, recomputed after every edit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStatus {
    pub total_weight: f64,
    pub is_valid: bool,
}

impl AllocationStatus {
    pub fn of(total_weight: f64) -> Self {
        Self {
            total_weight,
            is_valid: (total_weight - TOTAL_ALLOCATION).abs() <= ALLOCATION_TOLERANCE,
        }
    }
}

/// A position after commit: integer weight, sum across the set exactly 100.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommittedPosition {
    pub id: String,
    pub label: String,
    pub weight: i32,
    pub locked: bool,
}

/// Precondition failures reported by allocation operations.
///
/// These are ordinary return values, never panics: the operation leaves the
/// position list untouched and the caller informs the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("cannot adjust allocations - all positions are locked")]
    AllLocked,

    #[error("position '{0}' is locked")]
    PositionLocked(String),

    #[error("no position with id '{0}'")]
    UnknownPosition(String),
}
