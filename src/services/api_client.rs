//! Typed HTTP client for the FleetLink API.
//!
//! Thin wrappers over the four endpoints the client flows consume:
//! availability search, booking creation, the managed bookings listing and
//! cancellation. Response bodies deserialize into the shared wire types;
//! non-2xx responses surface the body's `message` field.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::BookingsPage;
use crate::models::vehicle::AvailableVehicle;
use crate::models::{Booking, BookingFilter};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Api { status: u16, message: Option<String> },
}

impl ClientError {
    /// The API error body's message when one was returned, otherwise the
    /// caller-supplied fallback. Mirrors how the flows render failures.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message,
            _ => fallback,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Availability search parameters, forwarded as entered. The server owns
/// parsing and validation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub capacity_required: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookVehicleRequest {
    pub vehicle_id: Uuid,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelResponse {
    pub message: String,
    pub booking: Booking,
}

#[derive(Clone)]
pub struct FleetApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl FleetApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub async fn get_available_vehicles(
        &self,
        params: &AvailabilityParams,
    ) -> Result<Vec<AvailableVehicle>, ClientError> {
        let response = self
            .http_client
            .get(format!("{}/api/vehicles/available", self.base_url))
            .query(params)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn book_vehicle(
        &self,
        request: &BookVehicleRequest,
    ) -> Result<Booking, ClientError> {
        let response = self
            .http_client
            .post(format!("{}/api/bookings", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn get_all_bookings(
        &self,
        page: u32,
        limit: u32,
        filter: BookingFilter,
    ) -> Result<BookingsPage, ClientError> {
        let response = self
            .http_client
            .get(format!("{}/api/manage-bookings", self.base_url))
            .query(&[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("filter", filter.as_str().to_string()),
            ])
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn cancel_booking(&self, id: Uuid) -> Result<CancelResponse, ClientError> {
        let response = self
            .http_client
            .patch(format!("{}/api/manage-bookings/{}/cancel", self.base_url, id))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let status = response.status().as_u16();
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            Err(ClientError::Api { status, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::test_fixtures;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bookings_page_body(bookings: Vec<serde_json::Value>, total: i64, page: u32) -> serde_json::Value {
        json!({
            "bookings": bookings,
            "pagination": { "total": total, "page": page, "totalPages": (total + 3) / 4 }
        })
    }

    #[tokio::test]
    async fn get_all_bookings_sends_page_limit_and_filter() {
        let server = MockServer::start().await;
        let booking = serde_json::to_value(test_fixtures::booking()).unwrap();

        Mock::given(method("GET"))
            .and(path("/api/manage-bookings"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "4"))
            .and(query_param("filter", "cancelled"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bookings_page_body(
                vec![booking],
                5,
                2,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = FleetApiClient::new(server.uri());
        let result = client
            .get_all_bookings(2, 4, BookingFilter::Cancelled)
            .await
            .unwrap();

        assert_eq!(result.bookings.len(), 1);
        assert_eq!(result.pagination.total, 5);
        assert_eq!(result.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn cancel_booking_hits_the_cancel_route() {
        let server = MockServer::start().await;
        let booking = test_fixtures::cancelled_booking();
        let id = booking.id;

        Mock::given(method("PATCH"))
            .and(path(format!("/api/manage-bookings/{}/cancel", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Booking cancelled successfully",
                "booking": serde_json::to_value(&booking).unwrap()
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = FleetApiClient::new(server.uri());
        let response = client.cancel_booking(id).await.unwrap();

        assert_eq!(response.message, "Booking cancelled successfully");
        assert!(response.booking.is_cancelled);
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Booking already cancelled" })),
            )
            .mount(&server)
            .await;

        let client = FleetApiClient::new(server.uri());
        let err = client.cancel_booking(Uuid::new_v4()).await.unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Booking already cancelled"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_the_generic_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = FleetApiClient::new(server.uri());
        let err = client
            .get_all_bookings(1, 4, BookingFilter::All)
            .await
            .unwrap_err();

        assert_eq!(err.message_or("Something went wrong"), "Something went wrong");
    }

    #[tokio::test]
    async fn available_vehicles_roundtrip() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/vehicles/available"))
            .and(query_param("capacityRequired", "500"))
            .and(query_param("fromPincode", "110001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": Uuid::new_v4(),
                "name": "Tata Ace",
                "capacityKg": 750,
                "tyres": 4,
                "createdAt": "2025-06-01T00:00:00Z",
                "estimatedRideDurationHours": 19
            }])))
            .mount(&server)
            .await;

        let client = FleetApiClient::new(server.uri());
        let vehicles = client
            .get_available_vehicles(&AvailabilityParams {
                capacity_required: "500".to_string(),
                from_pincode: "110001".to_string(),
                to_pincode: "110020".to_string(),
                start_time: "2025-07-01T10:00".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].vehicle.name, "Tata Ace");
        assert_eq!(vehicles[0].estimated_ride_duration_hours, 19);
    }
}
