//! Stocks module - the CSV-backed stock list powering the selector.

mod csv_loader;
mod stocks_model;
mod stocks_service;

pub use csv_loader::{load_stock_list, parse_stock_list};
pub use stocks_model::StockListing;
pub use stocks_service::{StockListService, StockListServiceTrait};
