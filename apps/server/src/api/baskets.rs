use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};
use stockpulse_core::baskets::{
    Basket, BasketUpdate, BasketWithPositions, NewBasket, PositionInput,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBasketRequest {
    basket: NewBasket,
    #[serde(default)]
    positions: Vec<PositionInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBasketRequest {
    basket: BasketUpdate,
    #[serde(default)]
    positions: Vec<PositionInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LockDateRequest {
    locked_at: DateTime<Utc>,
}

async fn list_baskets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Basket>>> {
    let baskets = state.basket_service.get_baskets()?;
    Ok(Json(baskets))
}

async fn get_basket(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BasketWithPositions>> {
    let basket = state.basket_service.get_basket(&id)?;
    Ok(Json(basket))
}

async fn get_most_recent_basket(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Option<BasketWithPositions>>> {
    let basket = state.basket_service.get_most_recent_basket()?;
    Ok(Json(basket))
}

async fn create_basket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBasketRequest>,
) -> ApiResult<Json<BasketWithPositions>> {
    let created = state
        .basket_service
        .create_basket(body.basket, body.positions)
        .await?;
    Ok(Json(created))
}

async fn update_basket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateBasketRequest>,
) -> ApiResult<Json<BasketWithPositions>> {
    let updated = state
        .basket_service
        .update_basket(body.basket, body.positions)
        .await?;
    Ok(Json(updated))
}

async fn delete_basket(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let _ = state.basket_service.delete_basket(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn lock_basket(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Basket>> {
    let basket = state.basket_service.lock_basket(id).await?;
    Ok(Json(basket))
}

async fn unlock_basket(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Basket>> {
    let basket = state.basket_service.unlock_basket(id).await?;
    Ok(Json(basket))
}

async fn update_lock_date(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<LockDateRequest>,
) -> ApiResult<Json<Basket>> {
    let basket = state
        .basket_service
        .update_lock_date(id, body.locked_at.naive_utc())
        .await?;
    Ok(Json(basket))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/baskets",
            get(list_baskets).post(create_basket).put(update_basket),
        )
        .route("/baskets/most-recent", get(get_most_recent_basket))
        .route("/baskets/{id}", get(get_basket).delete(delete_basket))
        .route("/baskets/{id}/lock", post(lock_basket))
        .route("/baskets/{id}/unlock", post(unlock_basket))
        .route("/baskets/{id}/lock-date", put(update_lock_date))
}
