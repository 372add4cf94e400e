pub mod booking;
pub mod vehicle;

pub use booking::{Booking, BookingFilter};
pub use vehicle::Vehicle;
