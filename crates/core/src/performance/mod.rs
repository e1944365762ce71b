//! Performance module - basket and portfolio tracking from lock date.

mod performance_model;
mod performance_service;

pub use performance_model::{BasketPerformance, PortfolioSummary};
pub use performance_service::{PerformanceService, PerformanceServiceTrait};
