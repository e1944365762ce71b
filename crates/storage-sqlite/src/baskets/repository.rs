use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use stockpulse_core::baskets::{
    Basket, BasketPosition, BasketRepositoryTrait, BasketUpdate, BasketWithPositions, NewBasket,
    NewBasketPosition,
};
use stockpulse_core::errors::{DatabaseError, Error, Result};

use super::model::{BasketDB, BasketPositionDB, NewBasketPositionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{basket_positions, baskets};

pub struct BasketRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl BasketRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        BasketRepository { pool, writer }
    }

    fn weights_json(basket_weights: &stockpulse_core::signals::SourceWeights) -> Result<String> {
        serde_json::to_string(basket_weights)
            .map_err(|e| StorageError::SerializationError(e.to_string()).into())
    }

    fn load_positions(
        conn: &mut SqliteConnection,
        for_basket_id: &str,
    ) -> Result<Vec<BasketPosition>> {
        let rows = basket_positions::table
            .filter(basket_positions::basket_id.eq(for_basket_id))
            .order(basket_positions::sort_order.asc())
            .load::<BasketPositionDB>(conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(BasketPosition::from).collect())
    }

    fn load_with_positions(
        conn: &mut SqliteConnection,
        basket_db: BasketDB,
    ) -> Result<BasketWithPositions> {
        let positions = Self::load_positions(conn, &basket_db.id)?;
        Ok(BasketWithPositions {
            basket: Basket::from(basket_db),
            positions,
        })
    }

    /// Rows for a basket's position list; ids are minted here and
    /// `sort_order` preserves the submitted order.
    fn position_rows(
        for_basket_id: &str,
        positions: Vec<NewBasketPosition>,
    ) -> Vec<NewBasketPositionDB> {
        positions
            .into_iter()
            .enumerate()
            .map(|(idx, p)| NewBasketPositionDB {
                id: Uuid::new_v4().to_string(),
                basket_id: for_basket_id.to_string(),
                symbol: p.symbol,
                name: p.name,
                allocation: p.allocation,
                is_locked: p.is_locked,
                sort_order: idx as i32,
            })
            .collect()
    }

    fn replace_positions(
        conn: &mut SqliteConnection,
        for_basket_id: &str,
        positions: Vec<NewBasketPosition>,
    ) -> Result<()> {
        diesel::delete(
            basket_positions::table.filter(basket_positions::basket_id.eq(for_basket_id)),
        )
        .execute(conn)
        .map_err(StorageError::from)?;

        let rows = Self::position_rows(for_basket_id, positions);
        diesel::insert_into(basket_positions::table)
            .values(&rows)
            .execute(conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn find_basket(conn: &mut SqliteConnection, basket_id: &str) -> Result<BasketDB> {
        baskets::table
            .find(basket_id)
            .first::<BasketDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    Error::Database(DatabaseError::NotFound(format!("basket {}", basket_id)))
                }
                other => StorageError::from(other).into(),
            })
    }
}

#[async_trait]
impl BasketRepositoryTrait for BasketRepository {
    fn list_baskets(&self) -> Result<Vec<Basket>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = baskets::table
            .order(baskets::updated_at.desc())
            .load::<BasketDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Basket::from).collect())
    }

    fn get_basket(&self, basket_id: &str) -> Result<BasketWithPositions> {
        let mut conn = get_connection(&self.pool)?;
        let basket_db = Self::find_basket(&mut conn, basket_id)?;
        Self::load_with_positions(&mut conn, basket_db)
    }

    fn get_most_recent_basket(&self) -> Result<Option<BasketWithPositions>> {
        let mut conn = get_connection(&self.pool)?;
        let basket_db = baskets::table
            .order(baskets::updated_at.desc())
            .first::<BasketDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        match basket_db {
            Some(basket_db) => Ok(Some(Self::load_with_positions(&mut conn, basket_db)?)),
            None => Ok(None),
        }
    }

    async fn insert_basket(
        &self,
        new_basket: NewBasket,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions> {
        let weights = Self::weights_json(&new_basket.source_weights)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BasketWithPositions> {
                let now = Utc::now().naive_utc();
                let row = BasketDB {
                    id: new_basket
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    name: new_basket.name,
                    source_weights: weights,
                    is_locked: false,
                    created_at: now,
                    updated_at: now,
                    locked_at: None,
                };

                let inserted = diesel::insert_into(baskets::table)
                    .values(&row)
                    .returning(BasketDB::as_returning())
                    .get_result::<BasketDB>(conn)
                    .map_err(StorageError::from)?;

                Self::replace_positions(conn, &inserted.id, positions)?;
                Self::load_with_positions(conn, inserted)
            })
            .await
    }

    async fn update_basket(
        &self,
        update: BasketUpdate,
        positions: Vec<NewBasketPosition>,
    ) -> Result<BasketWithPositions> {
        let weights = Self::weights_json(&update.source_weights)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BasketWithPositions> {
                let now = Utc::now().naive_utc();
                let updated = diesel::update(baskets::table.find(&update.id))
                    .set((
                        baskets::name.eq(&update.name),
                        baskets::source_weights.eq(&weights),
                        baskets::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "basket {}",
                        update.id
                    ))));
                }

                Self::replace_positions(conn, &update.id, positions)?;
                let basket_db = Self::find_basket(conn, &update.id)?;
                Self::load_with_positions(conn, basket_db)
            })
            .await
    }

    async fn delete_basket(&self, basket_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    basket_positions::table.filter(basket_positions::basket_id.eq(&basket_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(diesel::delete(baskets::table.find(&basket_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn set_basket_locked(
        &self,
        basket_id: String,
        locked_at: Option<NaiveDateTime>,
    ) -> Result<Basket> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Basket> {
                let now = Utc::now().naive_utc();
                let updated = diesel::update(baskets::table.find(&basket_id))
                    .set((
                        baskets::is_locked.eq(locked_at.is_some()),
                        baskets::locked_at.eq(locked_at),
                        baskets::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "basket {}",
                        basket_id
                    ))));
                }
                Ok(Basket::from(Self::find_basket(conn, &basket_id)?))
            })
            .await
    }

    async fn update_lock_date(
        &self,
        basket_id: String,
        locked_at: NaiveDateTime,
    ) -> Result<Basket> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Basket> {
                let updated = diesel::update(baskets::table.find(&basket_id))
                    .set(baskets::locked_at.eq(Some(locked_at)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "basket {}",
                        basket_id
                    ))));
                }
                Ok(Basket::from(Self::find_basket(conn, &basket_id)?))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use stockpulse_core::signals::SourceWeights;

    fn new_position(symbol: &str, allocation: i32) -> NewBasketPosition {
        NewBasketPosition {
            symbol: symbol.to_string(),
            name: format!("{} Inc.", symbol),
            allocation,
            is_locked: false,
        }
    }

    fn new_basket(name: &str) -> NewBasket {
        NewBasket {
            id: None,
            name: name.to_string(),
            source_weights: SourceWeights::default(),
        }
    }

    /// Fresh on-disk database with migrations applied and a writer running.
    fn setup() -> (tempfile::TempDir, BasketRepository) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = db::init(dir.path().join("test.db").to_str().unwrap()).unwrap();
        let pool = db::create_pool(&db_path).unwrap();
        db::run_migrations(&pool).unwrap();
        let writer = db::spawn_writer(pool.clone());
        (dir, BasketRepository::new(pool, writer))
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let (_dir, repo) = setup();

        let created = repo
            .insert_basket(
                new_basket("Tech Leaders"),
                vec![new_position("AAPL", 60), new_position("MSFT", 40)],
            )
            .await
            .unwrap();

        let fetched = repo.get_basket(&created.basket.id).unwrap();
        assert_eq!(fetched.basket.name, "Tech Leaders");
        assert_eq!(fetched.positions.len(), 2);
        // sort_order preserves submission order
        assert_eq!(fetched.positions[0].symbol, "AAPL");
        assert_eq!(fetched.positions[1].symbol, "MSFT");
        assert_eq!(
            fetched.positions.iter().map(|p| p.allocation).sum::<i32>(),
            100
        );
    }

    #[tokio::test]
    async fn test_get_missing_basket_is_not_found() {
        let (_dir, repo) = setup();
        let err = repo.get_basket("nope").unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_positions() {
        let (_dir, repo) = setup();
        let created = repo
            .insert_basket(new_basket("Tech"), vec![new_position("AAPL", 100)])
            .await
            .unwrap();

        let updated = repo
            .update_basket(
                BasketUpdate {
                    id: created.basket.id.clone(),
                    name: "Tech v2".to_string(),
                    source_weights: SourceWeights::default(),
                },
                vec![new_position("TSLA", 50), new_position("NVDA", 50)],
            )
            .await
            .unwrap();

        assert_eq!(updated.basket.name, "Tech v2");
        let symbols: Vec<_> = updated.positions.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TSLA", "NVDA"]);
        assert!(updated.basket.updated_at >= created.basket.updated_at);
    }

    #[tokio::test]
    async fn test_lock_unlock_cycle() {
        let (_dir, repo) = setup();
        let created = repo.insert_basket(new_basket("Tech"), vec![]).await.unwrap();
        let lock_time = Utc::now().naive_utc();

        let locked = repo
            .set_basket_locked(created.basket.id.clone(), Some(lock_time))
            .await
            .unwrap();
        assert!(locked.is_locked);
        assert_eq!(locked.locked_at, Some(lock_time));

        let moved = lock_time - chrono::Duration::days(7);
        let redated = repo
            .update_lock_date(created.basket.id.clone(), moved)
            .await
            .unwrap();
        assert_eq!(redated.locked_at, Some(moved));

        let unlocked = repo
            .set_basket_locked(created.basket.id.clone(), None)
            .await
            .unwrap();
        assert!(!unlocked.is_locked);
        assert!(unlocked.locked_at.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_basket_and_positions() {
        let (_dir, repo) = setup();
        let created = repo
            .insert_basket(new_basket("Tech"), vec![new_position("AAPL", 100)])
            .await
            .unwrap();

        assert_eq!(repo.delete_basket(created.basket.id.clone()).await.unwrap(), 1);
        assert!(repo.get_basket(&created.basket.id).is_err());
        assert_eq!(repo.delete_basket(created.basket.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_most_recent_tracks_updates() {
        let (_dir, repo) = setup();
        let first = repo.insert_basket(new_basket("First"), vec![]).await.unwrap();
        let _second = repo.insert_basket(new_basket("Second"), vec![]).await.unwrap();

        repo.update_basket(
            BasketUpdate {
                id: first.basket.id.clone(),
                name: "First again".to_string(),
                source_weights: SourceWeights::default(),
            },
            vec![],
        )
        .await
        .unwrap();

        let recent = repo.get_most_recent_basket().unwrap().unwrap();
        assert_eq!(recent.basket.id, first.basket.id);
    }
}
