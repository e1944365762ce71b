//! HTTP error mapping for the REST API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use stockpulse_core::allocation::AllocationError;
use stockpulse_core::errors::{DatabaseError, Error};
use stockpulse_market_data::MarketDataError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper turning domain errors into HTTP responses.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        ApiError(Error::Allocation(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(Error::Unexpected(err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
            Error::Validation(_) | Error::ConstraintViolation(_) | Error::Allocation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::MarketData(
                MarketDataError::SymbolNotFound(_) | MarketDataError::NoDataForRange,
            ) => StatusCode::NOT_FOUND,
            Error::MarketData(_) | Error::Signal(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("API error: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
