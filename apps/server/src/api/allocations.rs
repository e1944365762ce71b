//! Stateless allocation editing endpoints.
//!
//! The rebalancer is pure arithmetic; these endpoints run one operation
//! over the submitted position list and hand the result straight back.
//! Nothing is persisted here - committed positions go through the basket
//! endpoints.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{error::ApiResult, main_lib::AppState};
use stockpulse_core::allocation::{AllocationSet, AllocationStatus, CommittedPosition, Position};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum AllocationOp {
    SetWeight { id: String, value: f64 },
    DistributeRemaining,
    ResetEqual,
    Redistribute { id: String, value: f64 },
    ToggleLock { id: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    positions: Vec<Position>,
    op: AllocationOp,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    positions: Vec<Position>,
    #[serde(flatten)]
    status: AllocationStatus,
}

async fn preview(
    State(_state): State<Arc<AppState>>,
    Json(body): Json<PreviewRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    let mut set = AllocationSet::new(body.positions);
    let status = match body.op {
        AllocationOp::SetWeight { id, value } => set.set_weight(&id, value)?,
        AllocationOp::DistributeRemaining => set.distribute_remaining()?,
        AllocationOp::ResetEqual => set.reset_equal()?,
        AllocationOp::Redistribute { id, value } => set.redistribute_proportional(&id, value)?,
        AllocationOp::ToggleLock { id } => {
            set.toggle_lock(&id)?;
            set.status()
        }
    };
    Ok(Json(PreviewResponse {
        positions: set.into_positions(),
        status,
    }))
}

async fn commit(
    State(_state): State<Arc<AppState>>,
    Json(positions): Json<Vec<Position>>,
) -> ApiResult<Json<Vec<CommittedPosition>>> {
    let set = AllocationSet::new(positions);
    Ok(Json(set.commit()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/allocations/preview", post(preview))
        .route("/allocations/commit", post(commit))
}
