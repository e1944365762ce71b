//! Data models shared by the market data providers.

mod quote;

pub use quote::Quote;
