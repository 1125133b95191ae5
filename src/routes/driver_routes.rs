use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controllers::driver_controller;
use crate::state::AppState;

pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(driver_controller::create_driver))
        .route("/", get(driver_controller::list_drivers))
        .route("/me", get(driver_controller::me))
        .route("/:id", get(driver_controller::get_driver))
        .route("/:id", put(driver_controller::update_driver))
        .route("/:id", delete(driver_controller::delete_driver))
        .route("/:id/deliveries", get(driver_controller::list_driver_deliveries))
        .route("/:id/routes", get(driver_controller::list_driver_routes))
        .route("/:id/history", get(driver_controller::driver_history))
        .route("/:id/assign-vehicle", put(driver_controller::assign_vehicle))
        .route("/:id/provision-account", post(driver_controller::provision_account))
}
