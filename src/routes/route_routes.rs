use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controllers::route_controller;
use crate::state::AppState;

pub fn route_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(route_controller::create_route))
        .route("/", get(route_controller::list_routes))
        .route("/:id", get(route_controller::get_route))
        .route("/:id", put(route_controller::update_route))
        .route("/:id", delete(route_controller::delete_route))
        .route("/:id/deliveries", get(route_controller::list_route_deliveries))
        .route("/:id/deliveries", post(route_controller::add_delivery))
        .route(
            "/:id/deliveries/:delivery_id",
            delete(route_controller::remove_delivery),
        )
        .route("/:id/capacity", get(route_controller::route_capacity))
        .route("/:id/start", put(route_controller::start_route))
        .route("/:id/complete", put(route_controller::complete_route))
        .route("/:id/dashboard", get(route_controller::route_dashboard))
}
