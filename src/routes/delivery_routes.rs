use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controllers::delivery_controller;
use crate::state::AppState;

pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(delivery_controller::create_delivery))
        .route("/", get(delivery_controller::list_deliveries))
        .route("/:id", get(delivery_controller::get_delivery))
        .route("/:id", put(delivery_controller::update_delivery))
        .route("/:id", delete(delivery_controller::delete_delivery))
        .route("/:id/status", put(delivery_controller::update_delivery_status))
        .route("/:id/assign-driver", post(delivery_controller::assign_driver))
        .route("/:id/history", get(delivery_controller::delivery_history))
        .route("/:id/tracking", get(delivery_controller::tracking_detail))
}
