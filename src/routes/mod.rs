//! Definición de rutas HTTP y composición del router

pub mod auth_routes;
pub mod client_routes;
pub mod delivery_routes;
pub mod driver_routes;
pub mod report_routes;
pub mod route_routes;
pub mod vehicle_routes;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;

use crate::controllers::delivery_controller;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Construye el router completo de la aplicación.
///
/// Login, refresh, el rastreo público y el health check son los únicos
/// caminos sin autenticación; el resto pasa por el middleware JWT.
pub fn create_app_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/auth", auth_routes::auth_protected_routes())
        .nest("/api/clients", client_routes::client_routes())
        .nest("/api/drivers", driver_routes::driver_routes())
        .nest("/api/vehicles", vehicle_routes::vehicle_routes())
        .nest("/api/deliveries", delivery_routes::delivery_routes())
        .nest("/api/routes", route_routes::route_routes())
        .nest("/api/reports", report_routes::report_routes())
        .nest("/api/dashboard", report_routes::dashboard_routes())
        .layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes::auth_routes())
        .route("/api/tracking", get(delivery_controller::public_tracking))
        .merge(protected)
        .with_state(state)
}

/// Health check
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
