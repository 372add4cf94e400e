use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Booking, Vehicle};
use crate::AppState;

use super::vehicles::booking_window;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", post(create_booking))
}

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    #[validate(length(min = 1, message = "fromPincode must not be empty"))]
    pub from_pincode: String,
    #[validate(length(min = 1, message = "toPincode must not be empty"))]
    pub to_pincode: String,
    pub start_time: String,
    #[validate(length(min = 1, message = "customerName must not be empty"))]
    pub customer_name: String,
    #[validate(email(message = "customerEmail must be a valid email"))]
    pub customer_email: String,
    pub customer_id: Option<String>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let (start, end, _) = booking_window(&req.from_pincode, &req.to_pincode, &req.start_time)?;

    let vehicle = Vehicle::find_by_id(req.vehicle_id, &state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Vehicle not found".to_string()))?;

    // Re-verify availability for the computed window. Concurrent creates can
    // still race past this check; no serializable isolation is claimed.
    let conflict = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
          SELECT 1 FROM bookings
          WHERE vehicle_id = $1
            AND is_cancelled = FALSE
            AND start_time < $3
            AND end_time > $2
        )
        "#,
    )
    .bind(vehicle.id)
    .bind(start)
    .bind(end)
    .fetch_one(&state.db.pool)
    .await?;

    if conflict {
        return Err(ApiError::Conflict(
            "Vehicle is already booked for this time window".to_string(),
        ));
    }

    let customer_id = req
        .customer_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings
            (vehicle_id, customer_id, customer_name, customer_email,
             from_pincode, to_pincode, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(vehicle.id)
    .bind(&customer_id)
    .bind(&req.customer_name)
    .bind(&req.customer_email)
    .bind(&req.from_pincode)
    .bind(&req.to_pincode)
    .bind(start)
    .bind(end)
    .fetch_one(&state.db.pool)
    .await?;

    tracing::info!("booking {} created for vehicle {}", booking.id, vehicle.id);

    Ok((StatusCode::CREATED, Json(booking)))
}
