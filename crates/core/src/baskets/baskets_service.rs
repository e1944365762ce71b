use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use log::debug;

use crate::allocation::{AllocationSet, Position};
use crate::errors::{Error, Result, ValidationError};

use super::baskets_model::{
    Basket, BasketUpdate, BasketWithPositions, NewBasket, NewBasketPosition, PositionInput,
};
use super::baskets_traits::{BasketRepositoryTrait, BasketServiceTrait};

/// Service for managing baskets.
///
/// Saving runs the allocation commit over the submitted positions, so
/// storage only ever sees integer allocations summing to exactly 100. The
/// basket-level lock gates every mutation except unlocking.
pub struct BasketService {
    repository: Arc<dyn BasketRepositoryTrait>,
}

impl BasketService {
    pub fn new(repository: Arc<dyn BasketRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Commit the editor's fractional positions into persistable integers.
    ///
    /// An empty basket is allowed - there is nothing to rebalance yet.
    fn commit_positions(positions: Vec<PositionInput>) -> Result<Vec<NewBasketPosition>> {
        if positions.is_empty() {
            return Ok(Vec::new());
        }

        let set = AllocationSet::new(positions.into_iter().map(Position::from).collect());
        let committed = set.commit()?;
        Ok(committed
            .into_iter()
            .map(|p| NewBasketPosition {
                symbol: p.id,
                name: p.label,
                allocation: p.weight,
                is_locked: p.locked,
            })
            .collect())
    }

    fn validate_metadata(name: &str, weights_normalized: bool) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if !weights_normalized {
            return Err(Error::ConstraintViolation(
                "source weights must sum to 1".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_editable(&self, basket_id: &str) -> Result<Basket> {
        let existing = self.repository.get_basket(basket_id)?;
        if existing.basket.is_locked {
            return Err(Error::ConstraintViolation(format!(
                "basket '{}' is locked",
                existing.basket.name
            )));
        }
        Ok(existing.basket)
    }
}

#[async_trait]
impl BasketServiceTrait for BasketService {
    fn get_baskets(&self) -> Result<Vec<Basket>> {
        self.repository.list_baskets()
    }

    fn get_basket(&self, basket_id: &str) -> Result<BasketWithPositions> {
        self.repository.get_basket(basket_id)
    }

    fn get_most_recent_basket(&self) -> Result<Option<BasketWithPositions>> {
        self.repository.get_most_recent_basket()
    }

    async fn create_basket(
        &self,
        new_basket: NewBasket,
        positions: Vec<PositionInput>,
    ) -> Result<BasketWithPositions> {
        Self::validate_metadata(&new_basket.name, new_basket.source_weights.is_normalized())?;
        let committed = Self::commit_positions(positions)?;
        debug!(
            "Creating basket '{}' with {} positions",
            new_basket.name,
            committed.len()
        );
        self.repository.insert_basket(new_basket, committed).await
    }

    async fn update_basket(
        &self,
        update: BasketUpdate,
        positions: Vec<PositionInput>,
    ) -> Result<BasketWithPositions> {
        Self::validate_metadata(&update.name, update.source_weights.is_normalized())?;
        self.ensure_editable(&update.id)?;
        let committed = Self::commit_positions(positions)?;
        self.repository.update_basket(update, committed).await
    }

    async fn delete_basket(&self, basket_id: String) -> Result<usize> {
        self.ensure_editable(&basket_id)?;
        self.repository.delete_basket(basket_id).await
    }

    async fn lock_basket(&self, basket_id: String) -> Result<Basket> {
        let now = Utc::now().naive_utc();
        self.repository.set_basket_locked(basket_id, Some(now)).await
    }

    async fn unlock_basket(&self, basket_id: String) -> Result<Basket> {
        self.repository.set_basket_locked(basket_id, None).await
    }

    async fn update_lock_date(
        &self,
        basket_id: String,
        locked_at: NaiveDateTime,
    ) -> Result<Basket> {
        let existing = self.repository.get_basket(&basket_id)?;
        if !existing.basket.is_locked {
            return Err(Error::ConstraintViolation(format!(
                "basket '{}' is not locked",
                existing.basket.name
            )));
        }
        self.repository.update_lock_date(basket_id, locked_at).await
    }
}
