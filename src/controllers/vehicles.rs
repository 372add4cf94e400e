use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::ApiError;
use crate::models::booking::{estimated_ride_duration_hours, parse_start_time};
use crate::models::vehicle::AvailableVehicle;
use crate::models::Vehicle;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vehicles", post(add_vehicle))
        .route("/vehicles/available", get(get_available_vehicles))
}

// POST /api/vehicles
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddVehicleRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "capacityKg must be positive"))]
    pub capacity_kg: i32,
    #[validate(range(min = 2, message = "tyres must be at least 2"))]
    pub tyres: i32,
}

async fn add_vehicle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    let vehicle = sqlx::query_as::<_, Vehicle>(
        "INSERT INTO vehicles (name, capacity_kg, tyres)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(&req.name)
    .bind(req.capacity_kg)
    .bind(req.tyres)
    .fetch_one(&state.db.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

// GET /api/vehicles/available
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub capacity_required: i32,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
}

/// Resolves the requested route and start time into a concrete reservation
/// window, shared with booking creation.
pub(crate) fn booking_window(
    from_pincode: &str,
    to_pincode: &str,
    start_time: &str,
) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>, i64), ApiError> {
    let duration = estimated_ride_duration_hours(from_pincode, to_pincode).ok_or_else(|| {
        ApiError::Validation("fromPincode and toPincode must be numeric".to_string())
    })?;
    let start = parse_start_time(start_time)
        .ok_or_else(|| ApiError::Validation("startTime must be a valid timestamp".to_string()))?;
    Ok((start, start + Duration::hours(duration), duration))
}

async fn get_available_vehicles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if params.capacity_required <= 0 {
        return Err(ApiError::Validation(
            "capacityRequired must be positive".to_string(),
        ));
    }
    let (start, end, duration) =
        booking_window(&params.from_pincode, &params.to_pincode, &params.start_time)?;

    // A vehicle is available when no active booking overlaps the half-open
    // window [start, end).
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT v.*
        FROM vehicles v
        WHERE v.capacity_kg >= $1
          AND NOT EXISTS (
            SELECT 1 FROM bookings b
            WHERE b.vehicle_id = v.id
              AND b.is_cancelled = FALSE
              AND b.start_time < $3
              AND b.end_time > $2
          )
        ORDER BY v.created_at DESC
        "#,
    )
    .bind(params.capacity_required)
    .bind(start)
    .bind(end)
    .fetch_all(&state.db.pool)
    .await?;

    let payload: Vec<AvailableVehicle> = vehicles
        .into_iter()
        .map(|vehicle| AvailableVehicle {
            vehicle,
            estimated_ride_duration_hours: duration,
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}
