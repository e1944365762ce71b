//! SQLite storage implementation for baskets.

mod model;
mod repository;

pub use model::{BasketDB, BasketPositionDB, NewBasketPositionDB};
pub use repository::BasketRepository;
