pub mod bookings;
pub mod manage;
pub mod vehicles;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(vehicles::routes())
        .merge(bookings::routes())
        .merge(manage::routes())
}
