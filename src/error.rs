use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::Booking;

/// Unified handler error. Every variant renders as a JSON `{ message }` body;
/// the double-cancel case additionally attaches the current booking state.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Booking already cancelled")]
    AlreadyCancelled(Box<Booking>),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "message": msg }))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            ApiError::AlreadyCancelled(booking) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Booking already cancelled", "booking": booking }),
            ),
            ApiError::Database(err) => {
                tracing::error!("storage failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": err.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
