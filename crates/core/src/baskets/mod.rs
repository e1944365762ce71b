//! Baskets module - domain models, services, and traits.

mod baskets_model;
mod baskets_service;
mod baskets_traits;

#[cfg(test)]
mod baskets_service_tests;

pub use baskets_model::{
    Basket, BasketPosition, BasketUpdate, BasketWithPositions, NewBasket, NewBasketPosition,
    PositionInput,
};
pub use baskets_service::BasketService;
pub use baskets_traits::{BasketRepositoryTrait, BasketServiceTrait};
