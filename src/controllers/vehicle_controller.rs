//! Controlador de vehículos

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, StatusQuery};
use crate::dto::route_dto::RouteResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleHistoryResponse, VehicleResponse,
    VehicleStats,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::route::RouteStatus;
use crate::models::vehicle::{VehicleStatus, VehicleType};
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    if VehicleType::from_str(&payload.vehicle_type).is_none() {
        return Err(AppError::BadRequest(format!(
            "Tipo de vehículo inválido: '{}'",
            payload.vehicle_type
        )));
    }

    let repo = VehicleRepository::new(state.pool.clone());

    if repo.plate_exists(&payload.plate).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe un vehículo con la placa '{}'",
            payload.plate
        )));
    }

    let vehicle = repo
        .create(
            payload.plate,
            payload.model,
            payload.brand,
            payload.vehicle_type,
            payload.max_capacity,
            payload.manufacture_year,
            payload.odometer.unwrap_or_default(),
        )
        .await?;

    Ok(Json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<VehicleResponse>>>> {
    let repo = VehicleRepository::new(state.pool.clone());
    let vehicles = repo.list(query.status).await?;

    Ok(Json(ApiResponse::success(
        vehicles.into_iter().map(VehicleResponse::from).collect(),
    )))
}

pub async fn list_available_vehicles(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<VehicleResponse>>>> {
    let repo = VehicleRepository::new(state.pool.clone());
    let vehicles = repo.find_available().await?;

    Ok(Json(ApiResponse::success(
        vehicles.into_iter().map(VehicleResponse::from).collect(),
    )))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    let repo = VehicleRepository::new(state.pool.clone());
    let vehicle = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    if let Some(vehicle_type) = payload.vehicle_type.as_deref() {
        if VehicleType::from_str(vehicle_type).is_none() {
            return Err(AppError::BadRequest(format!(
                "Tipo de vehículo inválido: '{}'",
                vehicle_type
            )));
        }
    }
    if let Some(status) = payload.status.as_deref() {
        if VehicleStatus::from_str(status).is_none() {
            return Err(AppError::BadRequest(format!(
                "Estado de vehículo inválido: '{}'",
                status
            )));
        }
    }

    let repo = VehicleRepository::new(state.pool.clone());
    let vehicle = repo
        .update(
            id,
            payload.model,
            payload.brand,
            payload.vehicle_type,
            payload.max_capacity,
            payload.odometer,
            payload.status,
        )
        .await?;

    Ok(Json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    user.require_admin()?;

    let repo = VehicleRepository::new(state.pool.clone());

    let vehicle = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    if vehicle.status == "in_use" {
        return Err(AppError::Conflict(
            "No se puede eliminar un vehículo en uso".to_string(),
        ));
    }

    repo.delete(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Vehículo eliminado".to_string(),
    )))
}

/// Rutas de un vehículo; un conductor solo ve las suyas
pub async fn list_vehicle_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<RouteResponse>>>> {
    let vehicles = VehicleRepository::new(state.pool.clone());
    if vehicles.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
    }

    let routes_repo = RouteRepository::new(state.pool.clone());
    let routes = routes_repo.list_by_vehicle(id, user.scope()).await?;

    Ok(Json(ApiResponse::success(
        routes.into_iter().map(RouteResponse::from).collect(),
    )))
}

/// Historial de rutas del vehículo con estadísticas agregadas
pub async fn vehicle_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<VehicleHistoryResponse>>> {
    let vehicles = VehicleRepository::new(state.pool.clone());
    let routes_repo = RouteRepository::new(state.pool.clone());

    let vehicle = vehicles
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

    let routes = routes_repo.list_by_vehicle(id, user.scope()).await?;

    let total_routes = routes.len() as i64;
    let completed: Vec<_> = routes
        .iter()
        .filter(|r| RouteStatus::from_str(&r.status) == Some(RouteStatus::Completed))
        .collect();
    let completed_routes = completed.len() as i64;
    let total_distance: Decimal = completed.iter().map(|r| r.distance_actual).sum();
    let total_distance = total_distance.to_f64().unwrap_or(0.0);
    let mean_distance_per_route = if completed_routes > 0 {
        total_distance / completed_routes as f64
    } else {
        0.0
    };

    let recent_routes = routes
        .into_iter()
        .take(10)
        .map(RouteResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(VehicleHistoryResponse {
        vehicle: VehicleResponse::from(vehicle),
        stats: VehicleStats {
            total_routes,
            completed_routes,
            total_distance,
            mean_distance_per_route,
        },
        recent_routes,
    })))
}
