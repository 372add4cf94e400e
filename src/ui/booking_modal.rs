use crate::models::vehicle::AvailableVehicle;

/// Customer identity entered in the confirmation modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

/// Two-field confirmation form gating booking submission. The modal only
/// exists while a vehicle is selected; the owning flow drops it on close.
#[derive(Debug, Clone)]
pub struct BookingModal {
    vehicle: AvailableVehicle,
    name: String,
    email: String,
}

impl BookingModal {
    pub fn new(vehicle: AvailableVehicle) -> Self {
        Self {
            vehicle,
            name: String::new(),
            email: String::new(),
        }
    }

    pub fn vehicle(&self) -> &AvailableVehicle {
        &self.vehicle
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Submits the form. Returns the entered details when both fields are
    /// filled in; otherwise `None`, and the modal stays open.
    pub fn submit(&self) -> Option<CustomerDetails> {
        if self.name.is_empty() || self.email.is_empty() {
            return None;
        }
        Some(CustomerDetails {
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}
