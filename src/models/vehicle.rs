use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: i32,
    pub tyres: i32,
    pub created_at: DateTime<Utc>,
}

/// Availability search result: the vehicle plus the ride duration estimate
/// for the requested route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub estimated_ride_duration_hours: i64,
}

impl Vehicle {
    // Look up a vehicle by id
    pub async fn find_by_id(
        id: Uuid,
        db: &crate::database::Database,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }
}
