//! Stock list domain models.

use serde::{Deserialize, Serialize};

/// One listed stock from the CSV universe, optionally enriched with a
/// current price and day change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockListing {
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Day change in percent, derived from the quote's open and close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

impl StockListing {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price: None,
            change: None,
        }
    }

    /// Case-insensitive match on symbol or company name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.symbol.to_lowercase().contains(&query) || self.name.to_lowercase().contains(&query)
    }
}
