//! CSV stock list parsing.
//!
//! The stock universe ships as a two-column CSV with a strict
//! `symbol,company` header. Malformed rows are skipped with a warning so a
//! bad line can't take the whole selector down.

use std::path::Path;

use csv::ReaderBuilder;
use log::warn;

use crate::errors::{Error, Result, ValidationError};

use super::stocks_model::StockListing;

const EXPECTED_HEADERS: [&str; 2] = ["symbol", "company"];

/// Parse CSV content into stock listings.
pub fn parse_stock_list(content: &str) -> Result<Vec<StockListing>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Validation(ValidationError::InvalidInput(e.to_string())))?;
    if headers.iter().collect::<Vec<_>>() != EXPECTED_HEADERS {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "invalid stock list header '{}', expected 'symbol,company'",
            headers.iter().collect::<Vec<_>>().join(",")
        ))));
    }

    let mut stocks = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping stock list line {}: {}", line + 2, e);
                continue;
            }
        };

        match (record.get(0), record.get(1)) {
            (Some(symbol), Some(name)) if !symbol.is_empty() && !name.is_empty() => {
                stocks.push(StockListing::new(symbol, name));
            }
            _ => warn!("Skipping stock list line {}: missing symbol or company", line + 2),
        }
    }

    Ok(stocks)
}

/// Load and parse the stock list file.
pub fn load_stock_list(path: &Path) -> Result<Vec<StockListing>> {
    let content = std::fs::read_to_string(path)?;
    parse_stock_list(&content)
}
