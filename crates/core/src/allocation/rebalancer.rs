//! The allocation rebalancer: keeps a basket's weights summing to 100,
//! respecting per-position locks.
//!
//! Three distinct redistribution strategies are exposed on purpose - the
//! dashboard offers all three as separate affordances:
//!
//! - [`AllocationSet::distribute_remaining`]: additive, splits the gap to
//!   100 evenly across unlocked positions.
//! - [`AllocationSet::reset_equal`]: destructive, overwrites every unlocked
//!   weight with an equal share of what the locks leave over.
//! - [`AllocationSet::redistribute_proportional`]: the slider path - the
//!   dragged position takes its new value and the other unlocked positions
//!   make room in proportion to their current size.
//!
//! Weights stay fractional through any number of edits; integerization
//! happens once, in [`AllocationSet::commit`]. Accumulated floating-point
//! drift before that point is tolerated by design.

use serde::{Deserialize, Serialize};

use crate::constants::{ALLOCATION_TOLERANCE, TOTAL_ALLOCATION};

use super::allocation_model::{AllocationError, AllocationStatus, CommittedPosition, Position};

/// An ordered set of positions under edit.
///
/// The working copy is exclusively owned by the editing session; every
/// operation reads and writes this one list and returns the recomputed
/// [`AllocationStatus`]. Operations that fail leave the list untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AllocationSet {
    positions: Vec<Position>,
}

impl AllocationSet {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Current total and whether it is within tolerance of 100.
    pub fn status(&self) -> AllocationStatus {
        AllocationStatus::of(self.total())
    }

    /// Add a new position with zero weight, unlocked.
    ///
    /// Adding an id that is already present is a no-op; returns whether the
    /// position was inserted.
    pub fn add(&mut self, id: impl Into<String>, label: impl Into<String>) -> bool {
        let id = id.into();
        if self.index_of(&id).is_some() {
            return false;
        }
        self.positions.push(Position::new(id, label));
        true
    }

    /// Remove a position before commit; returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.positions.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Flip a position's lock flag; returns the new locked state.
    pub fn toggle_lock(&mut self, id: &str) -> Result<bool, AllocationError> {
        let idx = self.require(id)?;
        self.positions[idx].locked = !self.positions[idx].locked;
        Ok(self.positions[idx].locked)
    }

    /// Set a single position's weight directly (the numeric input path).
    ///
    /// The value is clamped at zero; there is no upper clamp - an over-100
    /// total is allowed transiently and surfaces through the returned
    /// status rather than being rejected. No other position is touched and
    /// no redistribution happens here; the caller follows up with one of
    /// the redistribution operations or with [`Self::commit`].
    pub fn set_weight(&mut self, id: &str, value: f64) -> Result<AllocationStatus, AllocationError> {
        let idx = self.require_unlocked(id)?;
        self.positions[idx].weight = value.max(0.0);
        Ok(self.status())
    }

    /// Split the gap between the current total and 100 evenly across the
    /// unlocked positions, additively.
    pub fn distribute_remaining(&mut self) -> Result<AllocationStatus, AllocationError> {
        let unlocked = self.unlocked_indices();
        if unlocked.is_empty() {
            return Err(AllocationError::AllLocked);
        }

        let share = (TOTAL_ALLOCATION - self.total()) / unlocked.len() as f64;
        for idx in unlocked {
            self.positions[idx].weight += share;
        }
        Ok(self.status())
    }

    /// Overwrite every unlocked weight with an equal share of whatever the
    /// locked positions leave over.
    pub fn reset_equal(&mut self) -> Result<AllocationStatus, AllocationError> {
        let unlocked = self.unlocked_indices();
        if unlocked.is_empty() {
            return Err(AllocationError::AllLocked);
        }

        let locked_sum: f64 = self
            .positions
            .iter()
            .filter(|p| p.locked)
            .map(|p| p.weight)
            .sum();
        let equal = (TOTAL_ALLOCATION - locked_sum) / unlocked.len() as f64;
        for idx in unlocked {
            self.positions[idx].weight = equal;
        }
        Ok(self.status())
    }

    /// The slider path: set the dragged position to `value` and let the
    /// other unlocked positions make room, each in proportion to its share
    /// of their combined weight (evenly when that combined weight is zero).
    ///
    /// Shrinking weights are floored at zero. Whatever residual the
    /// proportional pass leaves beyond the tolerance lands on the first
    /// unlocked position other than the target (list order), also floored
    /// at zero - when the locked positions alone exceed what `value` leaves
    /// over, the invariant is unsatisfiable without touching a lock and the
    /// excess stays visible in the returned status.
    pub fn redistribute_proportional(
        &mut self,
        id: &str,
        value: f64,
    ) -> Result<AllocationStatus, AllocationError> {
        let target = self.require_unlocked(id)?;
        let new_weight = value.max(0.0);
        let difference = new_weight - self.positions[target].weight;
        self.positions[target].weight = new_weight;

        let others: Vec<usize> = self
            .unlocked_indices()
            .into_iter()
            .filter(|&idx| idx != target)
            .collect();

        if !others.is_empty() {
            let total_other: f64 = others.iter().map(|&idx| self.positions[idx].weight).sum();

            for &idx in &others {
                let proportion = if total_other > 0.0 {
                    self.positions[idx].weight / total_other
                } else {
                    1.0 / others.len() as f64
                };
                self.positions[idx].weight =
                    (self.positions[idx].weight - difference * proportion).max(0.0);
            }

            let total = self.total();
            if (total - TOTAL_ALLOCATION).abs() > ALLOCATION_TOLERANCE {
                let absorber = others[0];
                self.positions[absorber].weight =
                    (self.positions[absorber].weight + TOTAL_ALLOCATION - total).max(0.0);
            }
        }

        Ok(self.status())
    }

    /// Commit the working weights: round each to the nearest integer and
    /// push the signed rounding residual onto the first unlocked position
    /// so the committed sum is exactly 100.
    ///
    /// Fails - leaving the working copy untouched - when every position is
    /// locked and the rounded sum misses 100, since no position may absorb
    /// the residual.
    pub fn commit(&self) -> Result<Vec<CommittedPosition>, AllocationError> {
        let mut committed: Vec<CommittedPosition> = self
            .positions
            .iter()
            .map(|p| CommittedPosition {
                id: p.id.clone(),
                label: p.label.clone(),
                weight: p.weight.round() as i32,
                locked: p.locked,
            })
            .collect();

        let target = TOTAL_ALLOCATION as i32;
        let sum: i32 = committed.iter().map(|p| p.weight).sum();
        if sum != target {
            match committed.iter_mut().find(|p| !p.locked) {
                Some(first) => first.weight += target - sum,
                None => return Err(AllocationError::AllLocked),
            }
        }

        Ok(committed)
    }

    fn total(&self) -> f64 {
        self.positions.iter().map(|p| p.weight).sum()
    }

    fn unlocked_indices(&self) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.locked)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.iter().position(|p| p.id == id)
    }

    fn require(&self, id: &str) -> Result<usize, AllocationError> {
        self.index_of(id)
            .ok_or_else(|| AllocationError::UnknownPosition(id.to_string()))
    }

    fn require_unlocked(&self, id: &str) -> Result<usize, AllocationError> {
        let idx = self.require(id)?;
        if self.positions[idx].locked {
            return Err(AllocationError::PositionLocked(id.to_string()));
        }
        Ok(idx)
    }
}

impl From<Vec<Position>> for AllocationSet {
    fn from(positions: Vec<Position>) -> Self {
        Self::new(positions)
    }
}
