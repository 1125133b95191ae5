//! Controlador de reportes

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::dto::common::ApiResponse;
use crate::dto::report_dto::{DashboardQuery, DriverDashboardResponse, ReportQuery, ReportsResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::AccessScope;
use crate::services::report_service::ReportService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn system_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ApiResponse<ReportsResponse>>> {
    user.require_admin()?;

    let service = ReportService::new(state.pool.clone());
    let report = service.system_report(query.period.as_deref()).await?;

    Ok(Json(ApiResponse::success(report)))
}

/// Dashboard operativo: un conductor ve el suyo; un admin indica cuál
pub async fn driver_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<ApiResponse<DriverDashboardResponse>>> {
    let driver_id = match user.scope() {
        AccessScope::Driver(driver_id) => driver_id,
        AccessScope::Admin => query.driver_id.ok_or_else(|| {
            AppError::BadRequest("El parámetro 'driver_id' es obligatorio".to_string())
        })?,
        AccessScope::Unlinked => {
            return Err(AppError::Forbidden(
                "Cuenta sin conductor vinculado".to_string(),
            ))
        }
    };

    let service = ReportService::new(state.pool.clone());
    let dashboard = service.driver_dashboard(driver_id).await?;

    Ok(Json(ApiResponse::success(dashboard)))
}
