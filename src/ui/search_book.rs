use uuid::Uuid;

use super::booking_modal::BookingModal;
use crate::models::vehicle::AvailableVehicle;
use crate::services::api_client::{AvailabilityParams, BookVehicleRequest, FleetApiClient};

/// Search criteria as entered. Everything stays a string until the server
/// parses it.
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub capacity_required: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
}

/// State container for the search-and-book screen: the criteria form, the
/// availability results, a transient message and the optional confirmation
/// modal.
pub struct SearchBookFlow {
    api: FleetApiClient,
    pub form: SearchForm,
    vehicles: Vec<AvailableVehicle>,
    message: Option<String>,
    searching: bool,
    modal: Option<BookingModal>,
}

impl SearchBookFlow {
    pub fn new(api: FleetApiClient) -> Self {
        Self {
            api,
            form: SearchForm::default(),
            vehicles: Vec::new(),
            message: None,
            searching: false,
            modal: None,
        }
    }

    pub fn vehicles(&self) -> &[AvailableVehicle] {
        &self.vehicles
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn modal(&self) -> Option<&BookingModal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut BookingModal> {
        self.modal.as_mut()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Runs the availability search with the current form contents.
    pub async fn search(&mut self) {
        self.message = None;
        self.searching = true;
        let result = self
            .api
            .get_available_vehicles(&AvailabilityParams {
                capacity_required: self.form.capacity_required.clone(),
                from_pincode: self.form.from_pincode.clone(),
                to_pincode: self.form.to_pincode.clone(),
                start_time: self.form.start_time.clone(),
            })
            .await;
        self.searching = false;

        match result {
            Ok(vehicles) => {
                if vehicles.is_empty() {
                    self.message = Some("No vehicles available for given criteria.".to_string());
                }
                self.vehicles = vehicles;
            }
            Err(err) => {
                self.message =
                    Some(format!("Error: {}", err.message_or("Something went wrong")));
            }
        }
    }

    /// Opens the confirmation modal for one of the displayed results.
    pub fn select_vehicle(&mut self, vehicle_id: Uuid) {
        self.modal = self
            .vehicles
            .iter()
            .find(|v| v.vehicle.id == vehicle_id)
            .cloned()
            .map(BookingModal::new);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Submits the confirmation modal. With an incomplete form the modal
    /// stays open and no request is issued. On success the booked vehicle
    /// leaves the result list and a transient success message is posted.
    pub async fn confirm_booking(&mut self) {
        let Some(modal) = &self.modal else { return };
        let Some(details) = modal.submit() else { return };
        let vehicle_id = modal.vehicle().vehicle.id;
        self.modal = None;

        let request = BookVehicleRequest {
            vehicle_id,
            from_pincode: self.form.from_pincode.clone(),
            to_pincode: self.form.to_pincode.clone(),
            start_time: self.form.start_time.clone(),
            customer_name: details.name,
            customer_email: details.email,
            customer_id: None,
        };

        match self.api.book_vehicle(&request).await {
            Ok(_) => {
                self.message = Some("Booking successful!".to_string());
                self.vehicles.retain(|v| v.vehicle.id != vehicle_id);
            }
            Err(err) => {
                self.message = Some(format!(
                    "Booking failed: {}",
                    err.message_or("Something went wrong")
                ));
            }
        }
    }
}
