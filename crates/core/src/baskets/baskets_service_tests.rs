use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::baskets::{
    Basket, BasketRepositoryTrait, BasketService, BasketServiceTrait, BasketUpdate,
    BasketWithPositions, NewBasket, NewBasketPosition, PositionInput,
};
use crate::errors::{DatabaseError, Error, Result};
use crate::signals::SourceWeights;

// --- In-memory repository ---

#[derive(Default)]
struct InMemoryBasketRepository {
    baskets: RwLock<HashMap<String, BasketWithPositions>>,
    next_id: RwLock<u32>,
    clock: RwLock<i64>,
}

impl InMemoryBasketRepository {
    fn mint_id(&self) -> String {
        let mut next = self.next_id.write().unwrap();
        *next += 1;
        format!("basket-{}", next)
    }

    /// Strictly increasing timestamps so "most recent" is unambiguous.
    fn now(&self) -> NaiveDateTime {
        let mut clock = self.clock.write().unwrap();
        *clock += 1;
        chrono::DateTime::from_timestamp(1_700_000_000 + *clock, 0)
            .unwrap()
            .naive_utc()
    }

    fn build_positions(basket_id: &str, positions: Vec<NewBasketPosition>) -> Vec<crate::baskets::BasketPosition> {
        positions
            .into_iter()
            .enumerate()
            .map(|(idx, p)| crate::baskets::BasketPosition {
                id: format!("{}-pos-{}", basket_id, idx),
                basket_id: basket_id.to_string(),
                symbol: p.symbol,
                name: p.name,
                allocation: p.allocation,
                is_locked: p.is_locked,
            })
            .collect()
    }
}

#[async_trait]
impl BasketRepositoryTrait for InMemoryBasketRepository {
    fn list_baskets(&self) -> Result<Vec<Basket>> {
        Ok(self
            .baskets
            .read()
            .unwrap()
            .values()
            .map(|b| b.basket.clone())
            .collect())
    }

    fn get_basket(&self, basket_id: &str) -> Result<BasketWithPositions> {
        self.baskets
            .read()
            .unwrap()
            .get(basket_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(basket_id.to_string())))
    }

    fn get_most_recent_basket(&self) -> Result<Option<BasketWithPositions>> {
        Ok(self
            .baskets
            .read()
            .unwrap()
            .values()
            .max_by_key(|b| b.basket.updated_at)
            .cloned())
    }

    async fn insert_basket(
        &self,
        new_basket: NewBasket,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions> {
        let id = new_basket.id.unwrap_or_else(|| self.mint_id());
        let now = self.now();
        let entry = BasketWithPositions {
            basket: Basket {
                id: id.clone(),
                name: new_basket.name,
                source_weights: new_basket.source_weights,
                is_locked: false,
                created_at: now,
                updated_at: now,
                locked_at: None,
            },
            positions: Self::build_positions(&id, positions),
        };
        self.baskets.write().unwrap().insert(id, entry.clone());
        Ok(entry)
    }

    async fn update_basket(
        &self,
        update: BasketUpdate,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions> {
        let mut baskets = self.baskets.write().unwrap();
        let entry = baskets
            .get_mut(&update.id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(update.id.clone())))?;
        entry.basket.name = update.name;
        entry.basket.source_weights = update.source_weights;
        entry.basket.updated_at = self.now();
        entry.positions = Self::build_positions(&update.id, positions);
        Ok(entry.clone())
    }

    async fn delete_basket(&self, basket_id: String) -> Result<usize> {
        Ok(self
            .baskets
            .write()
            .unwrap()
            .remove(&basket_id)
            .map(|_| 1)
            .unwrap_or(0))
    }

    async fn set_basket_locked(
        &self,
        basket_id: String,
        locked_at: Option<NaiveDateTime>,
    ) -> Result<Basket> {
        let mut baskets = self.baskets.write().unwrap();
        let entry = baskets
            .get_mut(&basket_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(basket_id.clone())))?;
        entry.basket.is_locked = locked_at.is_some();
        entry.basket.locked_at = locked_at;
        entry.basket.updated_at = self.now();
        Ok(entry.basket.clone())
    }

    async fn update_lock_date(
        &self,
        basket_id: String,
        locked_at: NaiveDateTime,
    ) -> Result<Basket> {
        let mut baskets = self.baskets.write().unwrap();
        let entry = baskets
            .get_mut(&basket_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(basket_id.clone())))?;
        entry.basket.locked_at = Some(locked_at);
        Ok(entry.basket.clone())
    }
}

// --- Helpers ---

fn service() -> BasketService {
    BasketService::new(Arc::new(InMemoryBasketRepository::default()))
}

fn tech_basket() -> NewBasket {
    NewBasket {
        id: None,
        name: "Tech Leaders".to_string(),
        source_weights: SourceWeights::default(),
    }
}

fn input(symbol: &str, weight: f64, locked: bool) -> PositionInput {
    PositionInput {
        symbol: symbol.to_string(),
        name: format!("{} Inc.", symbol),
        weight,
        locked,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_create_commits_fractional_weights_to_integers() {
    let service = service();
    let created = service
        .create_basket(
            tech_basket(),
            vec![
                input("AAPL", 33.3, false),
                input("MSFT", 33.3, false),
                input("AMZN", 33.3, false),
            ],
        )
        .await
        .unwrap();

    let total: i32 = created.positions.iter().map(|p| p.allocation).sum();
    assert_eq!(total, 100);
    assert_eq!(created.positions[0].allocation, 34); // first unlocked absorbs
    assert!(!created.basket.is_locked);
}

#[tokio::test]
async fn test_create_refuses_uncommittable_positions() {
    let service = service();
    let err = service
        .create_basket(
            tech_basket(),
            vec![input("AAPL", 49.6, true), input("MSFT", 49.6, true)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Allocation(_)));
}

#[tokio::test]
async fn test_create_allows_empty_basket() {
    let service = service();
    let created = service.create_basket(tech_basket(), vec![]).await.unwrap();
    assert!(created.positions.is_empty());
}

#[tokio::test]
async fn test_create_validates_name_and_weights() {
    let service = service();

    let mut unnamed = tech_basket();
    unnamed.name = "  ".to_string();
    assert!(matches!(
        service.create_basket(unnamed, vec![]).await.unwrap_err(),
        Error::Validation(_)
    ));

    let mut skewed = tech_basket();
    skewed.source_weights = SourceWeights {
        twitter: 0.9,
        google_trends: 0.9,
        news: 0.9,
    };
    assert!(matches!(
        service.create_basket(skewed, vec![]).await.unwrap_err(),
        Error::ConstraintViolation(_)
    ));
}

#[tokio::test]
async fn test_locked_basket_rejects_update_and_delete() {
    let service = service();
    let created = service
        .create_basket(tech_basket(), vec![input("AAPL", 100.0, false)])
        .await
        .unwrap();
    let id = created.basket.id.clone();

    service.lock_basket(id.clone()).await.unwrap();

    let update = BasketUpdate {
        id: id.clone(),
        name: "Renamed".to_string(),
        source_weights: SourceWeights::default(),
    };
    assert!(matches!(
        service.update_basket(update, vec![]).await.unwrap_err(),
        Error::ConstraintViolation(_)
    ));
    assert!(matches!(
        service.delete_basket(id.clone()).await.unwrap_err(),
        Error::ConstraintViolation(_)
    ));

    // Unlocking clears the gate and the timestamp.
    let unlocked = service.unlock_basket(id.clone()).await.unwrap();
    assert!(!unlocked.is_locked);
    assert!(unlocked.locked_at.is_none());
    assert_eq!(service.delete_basket(id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_lock_stamps_timestamp() {
    let service = service();
    let created = service.create_basket(tech_basket(), vec![]).await.unwrap();

    let locked = service.lock_basket(created.basket.id.clone()).await.unwrap();
    assert!(locked.is_locked);
    assert!(locked.locked_at.is_some());
}

#[tokio::test]
async fn test_update_lock_date_requires_locked_basket() {
    let service = service();
    let created = service.create_basket(tech_basket(), vec![]).await.unwrap();
    let id = created.basket.id.clone();
    let date = Utc::now().naive_utc();

    assert!(matches!(
        service.update_lock_date(id.clone(), date).await.unwrap_err(),
        Error::ConstraintViolation(_)
    ));

    service.lock_basket(id.clone()).await.unwrap();
    let updated = service.update_lock_date(id, date).await.unwrap();
    assert_eq!(updated.locked_at, Some(date));
}

#[tokio::test]
async fn test_most_recent_basket_follows_updates() {
    let service = service();
    let first = service.create_basket(tech_basket(), vec![]).await.unwrap();
    let mut second_meta = tech_basket();
    second_meta.name = "Energy".to_string();
    let second = service.create_basket(second_meta, vec![]).await.unwrap();

    // Touch the first basket so it becomes the most recent.
    let update = BasketUpdate {
        id: first.basket.id.clone(),
        name: "Tech Leaders v2".to_string(),
        source_weights: SourceWeights::default(),
    };
    service.update_basket(update, vec![]).await.unwrap();

    let recent = service.get_most_recent_basket().unwrap().unwrap();
    assert_eq!(recent.basket.id, first.basket.id);
    assert_ne!(recent.basket.id, second.basket.id);
}
