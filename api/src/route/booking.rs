use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    cancel_booking, create_booking, show_booking, show_booking_list,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let routers = Router::new()
        .route("/", post(create_booking))
        .route("/", get(show_booking_list))
        .route("/:booking_number", get(show_booking))
        .route("/:booking_number/cancel", post(cancel_booking));

    Router::new().nest("/bookings", routers)
}
