use axum::{routing::get, Router};

use crate::controllers::report_controller;
use crate::state::AppState;

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/", get(report_controller::system_report))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/driver", get(report_controller::driver_dashboard))
}
