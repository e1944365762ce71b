//! Allocation module - basket weight editing and rebalancing.
//!
//! Everything here is pure, synchronous arithmetic over an in-memory
//! position list. Persistence and refresh concerns live with the callers.

mod allocation_model;
mod rebalancer;

#[cfg(test)]
mod rebalancer_tests;

pub use allocation_model::{AllocationError, AllocationStatus, CommittedPosition, Position};
pub use rebalancer::AllocationSet;
