use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;

use super::baskets_model::{
    Basket, BasketUpdate, BasketWithPositions, NewBasket, NewBasketPosition, PositionInput,
};

/// Trait for basket repository operations.
#[async_trait]
pub trait BasketRepositoryTrait: Send + Sync {
    fn list_baskets(&self) -> Result<Vec<Basket>>;
    fn get_basket(&self, basket_id: &str) -> Result<BasketWithPositions>;
    /// The most recently updated basket, if any exist.
    fn get_most_recent_basket(&self) -> Result<Option<BasketWithPositions>>;
    async fn insert_basket(
        &self,
        new_basket: NewBasket,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions>;
    /// Update metadata and replace the position list.
    async fn update_basket(
        &self,
        update: BasketUpdate,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions>;
    async fn delete_basket(&self, basket_id: String) -> Result<usize>;
    /// Lock (with timestamp) or unlock (with `None`) a basket.
    async fn set_basket_locked(
        &self,
        basket_id: String,
        locked_at: Option<NaiveDateTime>,
    ) -> Result<Basket>;
    async fn update_lock_date(
        &self,
        basket_id: String,
        locked_at: NaiveDateTime,
    ) -> Result<Basket>;
}

/// Trait for basket service operations.
#[async_trait]
pub trait BasketServiceTrait: Send + Sync {
    fn get_baskets(&self) -> Result<Vec<Basket>>;
    fn get_basket(&self, basket_id: &str) -> Result<BasketWithPositions>;
    fn get_most_recent_basket(&self) -> Result<Option<BasketWithPositions>>;
    async fn create_basket(
        &self,
        new_basket: NewBasket,
        positions: Vec<PositionInput>,
    ) -> Result<BasketWithPositions>;
    async fn update_basket(
        &self,
        update: BasketUpdate,
        positions: Vec<PositionInput>,
    ) -> Result<BasketWithPositions>;
    async fn delete_basket(&self, basket_id: String) -> Result<usize>;
    async fn lock_basket(&self, basket_id: String) -> Result<Basket>;
    async fn unlock_basket(&self, basket_id: String) -> Result<Basket>;
    async fn update_lock_date(
        &self,
        basket_id: String,
        locked_at: NaiveDateTime,
    ) -> Result<Basket>;
}
