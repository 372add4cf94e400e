//! Client-side flow state. Each module owns the state of one screen: the
//! search-and-book page, its confirmation modal, and the managed bookings
//! view. Flows talk to the API through
//! [`crate::services::api_client::FleetApiClient`] and re-derive their state
//! from the responses; rendering is left to the host.

pub mod booking_modal;
pub mod search_book;
pub mod view_bookings;

/// How long a host should keep a transient flow message on screen before
/// calling `clear_message`.
pub const TRANSIENT_MESSAGE_SECS: u64 = 3;
