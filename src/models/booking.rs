use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Vehicle;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    /// Joined vehicle record, present only on list reads.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
}

/// Listing discriminator over the cancellation state. This predicate is the
/// single source of truth for status filtering, server- and client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingFilter {
    #[default]
    All,
    Booked,
    Cancelled,
}

impl BookingFilter {
    /// `is_cancelled` value the filter restricts to; `None` means unrestricted.
    pub fn cancelled_state(self) -> Option<bool> {
        match self {
            BookingFilter::All => None,
            BookingFilter::Booked => Some(false),
            BookingFilter::Cancelled => Some(true),
        }
    }

    pub fn matches(self, booking: &Booking) -> bool {
        match self.cancelled_state() {
            None => true,
            Some(state) => booking.is_cancelled == state,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingFilter::All => "all",
            BookingFilter::Booked => "booked",
            BookingFilter::Cancelled => "cancelled",
        }
    }
}

/// Pagination metadata attached to a bookings page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub total_pages: i64,
}

/// One page of the bookings listing, as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsPage {
    pub bookings: Vec<Booking>,
    pub pagination: Pagination,
}

/// Ride duration estimate between two numeric pincodes, in hours:
/// `|to - from| mod 24`. `None` when either pincode is non-numeric.
pub fn estimated_ride_duration_hours(from_pincode: &str, to_pincode: &str) -> Option<i64> {
    let from: i64 = from_pincode.trim().parse().ok()?;
    let to: i64 = to_pincode.trim().parse().ok()?;
    Some((to - from).abs() % 24)
}

/// Parses a booking start time. Accepts RFC 3339 as well as the zone-less
/// `YYYY-MM-DDTHH:MM[:SS]` shape browser datetime-local inputs produce,
/// which is read as UTC.
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Some(Utc.from_utc_datetime(&naive))
}
