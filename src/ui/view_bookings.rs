use uuid::Uuid;

use crate::models::{Booking, BookingFilter};
use crate::services::api_client::FleetApiClient;

/// Fixed page size of the managed bookings view.
pub const PAGE_SIZE: u32 = 4;

/// State container for the managed bookings screen: one fetched page, the
/// pagination cursor and the active status filter.
pub struct ViewBookingsFlow {
    api: FleetApiClient,
    bookings: Vec<Booking>,
    page: u32,
    total_pages: i64,
    filter: BookingFilter,
    message: Option<String>,
    loading: bool,
}

impl ViewBookingsFlow {
    pub fn new(api: FleetApiClient) -> Self {
        Self {
            api,
            bookings: Vec::new(),
            page: 1,
            total_pages: 1,
            filter: BookingFilter::All,
            message: None,
            loading: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> i64 {
        self.total_pages
    }

    pub fn filter(&self) -> BookingFilter {
        self.filter
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Bookings visible under the active filter. The status predicate is
    /// applied here and nowhere else, so a locally patched record simply
    /// falls out of view when it stops matching.
    pub fn visible_bookings(&self) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| self.filter.matches(b))
            .collect()
    }

    /// Fetches the current page under the current filter.
    pub async fn refresh(&mut self) {
        self.loading = true;
        let result = self
            .api
            .get_all_bookings(self.page, PAGE_SIZE, self.filter)
            .await;
        self.loading = false;

        match result {
            Ok(page) => {
                self.bookings = page.bookings;
                self.total_pages = page.pagination.total_pages.max(1);
                self.message = None;
            }
            Err(err) => {
                self.message = Some(err.message_or("Error fetching bookings").to_string());
            }
        }
    }

    /// Switches the status filter and re-fetches from the first page, so the
    /// page index cannot point past the new result range.
    pub async fn set_filter(&mut self, filter: BookingFilter) {
        self.filter = filter;
        self.page = 1;
        self.refresh().await;
    }

    pub async fn next_page(&mut self) {
        if i64::from(self.page) < self.total_pages {
            self.page += 1;
            self.refresh().await;
        }
    }

    pub async fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.refresh().await;
        }
    }

    /// Cancels one booking and patches the matching local record instead of
    /// re-fetching the page.
    pub async fn cancel(&mut self, id: Uuid) {
        match self.api.cancel_booking(id).await {
            Ok(response) => {
                self.message = Some(response.message);
                if let Some(booking) = self.bookings.iter_mut().find(|b| b.id == id) {
                    booking.is_cancelled = true;
                }
            }
            Err(err) => {
                self.message = Some(err.message_or("Failed to cancel booking").to_string());
            }
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

    fn page_body(bookings: &[Booking], total: i64, page: u32, total_pages: i64) -> serde_json::Value {
        json!({
            "bookings": bookings,
            "pagination": { "total": total, "page": page, "totalPages": total_pages }
        })
    }

    #[tokio::test]
    async fn refresh_loads_a_page_and_its_metadata() {
        let server = MockServer::start().await;
        let bookings = vec![test_fixtures::booking(), test_fixtures::booking()];
        Mock::given(method("GET"))
            .and(path("/api/manage-bookings"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "4"))
            .and(query_param("filter", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&bookings, 10, 1, 3)))
            .mount(&server)
            .await;

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.refresh().await;

        assert_eq!(flow.visible_bookings().len(), 2);
        assert_eq!(flow.total_pages(), 3);
        assert!(flow.message().is_none());
    }

    #[tokio::test]
    async fn pagination_clamps_at_both_ends() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/manage-bookings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(&[test_fixtures::booking()], 1, 1, 1)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.refresh().await;

        // single page: neither direction may fetch again
        flow.next_page().await;
        flow.prev_page().await;
        assert_eq!(flow.page(), 1);
    }

    #[tokio::test]
    async fn next_and_prev_move_within_range() {
        let server = MockServer::start().await;
        for page in ["1", "2"] {
            Mock::given(method("GET"))
                .and(path("/api/manage-bookings"))
                .and(query_param("page", page))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page_body(&[test_fixtures::booking()], 5, 1, 2)),
                )
                .mount(&server)
                .await;
        }

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.refresh().await;
        flow.next_page().await;
        assert_eq!(flow.page(), 2);
        flow.next_page().await; // clamped at the last page
        assert_eq!(flow.page(), 2);
        flow.prev_page().await;
        assert_eq!(flow.page(), 1);
    }

    #[tokio::test]
    async fn cancel_patches_the_local_record() {
        let server = MockServer::start().await;
        let booking = test_fixtures::booking();
        let id = booking.id;
        let mut cancelled = booking.clone();
        cancelled.is_cancelled = true;
        Mock::given(method("GET"))
            .and(path("/api/manage-bookings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(std::slice::from_ref(&booking), 1, 1, 1)),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("/api/manage-bookings/{}/cancel", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Booking cancelled successfully",
                "booking": cancelled
            })))
            .mount(&server)
            .await;

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.refresh().await;
        flow.cancel(id).await;

        assert_eq!(flow.message(), Some("Booking cancelled successfully"));
        assert!(flow.visible_bookings()[0].is_cancelled);
    }

    #[tokio::test]
    async fn cancelled_row_leaves_the_booked_view() {
        let server = MockServer::start().await;
        let booking = test_fixtures::booking();
        let id = booking.id;
        let mut cancelled = booking.clone();
        cancelled.is_cancelled = true;

        Mock::given(method("GET"))
            .and(path("/api/manage-bookings"))
            .and(query_param("filter", "booked"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(std::slice::from_ref(&booking), 1, 1, 1)),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("/api/manage-bookings/{}/cancel", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Booking cancelled successfully",
                "booking": cancelled
            })))
            .mount(&server)
            .await;

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.set_filter(BookingFilter::Booked).await;
        assert_eq!(flow.visible_bookings().len(), 1);

        flow.cancel(id).await;

        // patched locally, and the shared predicate hides it under "booked"
        assert!(flow.visible_bookings().is_empty());
    }

    #[tokio::test]
    async fn refresh_failure_surfaces_the_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "message": "pool exhausted" })),
            )
            .mount(&server)
            .await;

        let mut flow = ViewBookingsFlow::new(FleetApiClient::new(server.uri()));
        flow.refresh().await;

        assert_eq!(flow.message(), Some("pool exhausted"));
    }
}
