use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::auth_controller;
use crate::state::AppState;

/// Rutas públicas de autenticación
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth_controller::login))
        .route("/refresh", post(auth_controller::refresh))
}

/// Rutas de autenticación que requieren token
pub fn auth_protected_routes() -> Router<AppState> {
    Router::new().route("/me", get(auth_controller::me))
}
