use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controllers::vehicle_controller;
use crate::state::AppState;

pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(vehicle_controller::create_vehicle))
        .route("/", get(vehicle_controller::list_vehicles))
        .route("/available", get(vehicle_controller::list_available_vehicles))
        .route("/:id", get(vehicle_controller::get_vehicle))
        .route("/:id", put(vehicle_controller::update_vehicle))
        .route("/:id", delete(vehicle_controller::delete_vehicle))
        .route("/:id/routes", get(vehicle_controller::list_vehicle_routes))
        .route("/:id/history", get(vehicle_controller::vehicle_history))
}
