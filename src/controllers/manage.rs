use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::Row;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::booking::{BookingsPage, Pagination};
use crate::models::{Booking, BookingFilter, Vehicle};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/manage-bookings", get(get_all_bookings))
        .route("/manage-bookings/{id}/cancel", patch(cancel_booking))
}

/* ---------- helpers ---------- */

pub(crate) fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

async fn find_booking(pool: &sqlx::PgPool, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/* ---------- LIST ---------- */

// GET /api/manage-bookings?page=1&limit=4&filter=booked
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub filter: Option<BookingFilter>,
}

async fn get_all_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let filter = params.filter.unwrap_or_default();
    let offset = (page - 1) * limit;

    let cancelled = filter.cancelled_state();

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM bookings WHERE ($1::boolean IS NULL OR is_cancelled = $1)",
    )
    .bind(cancelled)
    .fetch_one(&state.db.pool)
    .await?;

    let rows = sqlx::query(
        r#"
        SELECT b.id, b.vehicle_id, b.customer_id, b.customer_name, b.customer_email,
               b.from_pincode, b.to_pincode, b.start_time, b.end_time,
               b.is_cancelled, b.created_at,
               v.id AS v_id, v.name AS v_name, v.capacity_kg AS v_capacity_kg,
               v.tyres AS v_tyres, v.created_at AS v_created_at
        FROM bookings b
        LEFT JOIN vehicles v ON v.id = b.vehicle_id
        WHERE ($1::boolean IS NULL OR b.is_cancelled = $1)
        ORDER BY b.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(cancelled)
    .bind(limit as i64)
    .bind(offset as i64)
    .fetch_all(&state.db.pool)
    .await?;

    let bookings: Vec<Booking> = rows
        .into_iter()
        .map(|row| {
            let vehicle = row.try_get::<Uuid, _>("v_id").ok().map(|vid| Vehicle {
                id: vid,
                name: row.get("v_name"),
                capacity_kg: row.get("v_capacity_kg"),
                tyres: row.get("v_tyres"),
                created_at: row.get("v_created_at"),
            });
            Booking {
                id: row.get("id"),
                vehicle_id: row.get("vehicle_id"),
                customer_id: row.get("customer_id"),
                customer_name: row.get("customer_name"),
                customer_email: row.get("customer_email"),
                from_pincode: row.get("from_pincode"),
                to_pincode: row.get("to_pincode"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
                is_cancelled: row.get("is_cancelled"),
                created_at: row.get("created_at"),
                vehicle,
            }
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(BookingsPage {
            bookings,
            pagination: Pagination {
                total,
                page,
                total_pages: total_pages(total, limit as i64),
            },
        }),
    ))
}

/* ---------- CANCEL ---------- */

// PATCH /api/manage-bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = find_booking(&state.db.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if booking.is_cancelled {
        return Err(ApiError::AlreadyCancelled(Box::new(booking)));
    }

    // Compare-and-set keeps the transition one-way under concurrent cancels:
    // exactly one request flips the flag, the loser sees zero rows.
    let updated = sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET is_cancelled = TRUE
         WHERE id = $1 AND is_cancelled = FALSE
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(&state.db.pool)
    .await?;

    match updated {
        Some(booking) => {
            tracing::info!("booking {} cancelled", booking.id);
            Ok((
                StatusCode::OK,
                Json(json!({
                    "message": "Booking cancelled successfully",
                    "booking": booking
                })),
            ))
        }
        None => {
            // A concurrent cancel won the race between the read and the write.
            let current = find_booking(&state.db.pool, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
            Err(ApiError::AlreadyCancelled(Box::new(current)))
        }
    }
}
