use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::availability::{register_slot, show_availability_list};
use crate::handler::resource::{
    register_resource, show_resource, show_resource_list, show_resource_type_list,
    update_resource_active,
};

pub fn build_resource_routers() -> Router<AppRegistry> {
    let resources_routers = Router::new()
        .route("/", get(show_resource_list))
        .route("/", post(register_resource))
        .route("/types", get(show_resource_type_list))
        .route("/:resource_id", get(show_resource))
        .route("/:resource_id/active", put(update_resource_active))
        .route("/:resource_id/slots", post(register_slot));

    Router::new()
        .nest("/resources", resources_routers)
        .route("/availabilities", get(show_availability_list))
}
