use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::controllers::client_controller;
use crate::state::AppState;

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(client_controller::create_client))
        .route("/", get(client_controller::list_clients))
        .route("/:id", get(client_controller::get_client))
        .route("/:id", put(client_controller::update_client))
        .route("/:id", delete(client_controller::delete_client))
}
