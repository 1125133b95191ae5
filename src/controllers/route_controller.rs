//! Controlador de rutas
//!
//! Las operaciones de capacidad delegan en el motor de capacidad; el
//! inicio y cierre de rutas en su ciclo de vida.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, StatusQuery};
use crate::dto::delivery_dto::DeliveryResponse;
use crate::dto::driver_dto::DriverResponse;
use crate::dto::route_dto::{
    AddDeliveryRequest, CapacityResponse, CompleteRouteRequest, CreateRouteRequest,
    DeliveryStatusCounts, RouteDashboardResponse, RouteResponse, UpdateRouteRequest,
};
use crate::dto::vehicle_dto::VehicleResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::route::Route;
use crate::repositories::delivery_repository::DeliveryRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::AccessScope;
use crate::services::capacity::CapacityEngine;
use crate::services::route_lifecycle::RouteLifecycle;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn create_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateRouteRequest>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = RouteRepository::new(state.pool.clone());
    let route = repo
        .create(
            payload.name,
            payload.description,
            payload.driver_id,
            payload.vehicle_id,
            payload.route_date,
            payload.distance_estimated,
            payload.duration_estimated_minutes,
        )
        .await?;

    // El set inicial de entregas pasa por el motor de capacidad
    if let Some(delivery_ids) = payload.deliveries {
        if !delivery_ids.is_empty() {
            let engine = CapacityEngine::new(state.pool.clone());
            engine
                .attach_initial_deliveries(route.id, &delivery_ids)
                .await?;
        }
    }

    let route = repo
        .find_by_id(route.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

    Ok(Json(ApiResponse::success(RouteResponse::from(route))))
}

pub async fn list_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<RouteResponse>>>> {
    let repo = RouteRepository::new(state.pool.clone());
    let routes = repo.list(user.scope(), query.status).await?;

    Ok(Json(ApiResponse::success(
        routes.into_iter().map(RouteResponse::from).collect(),
    )))
}

pub async fn get_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    let repo = RouteRepository::new(state.pool.clone());
    let route = find_visible_route(&repo, id, &user).await?;

    Ok(Json(ApiResponse::success(RouteResponse::from(route))))
}

pub async fn update_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRouteRequest>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = RouteRepository::new(state.pool.clone());
    let route = repo
        .update(
            id,
            payload.name,
            payload.description,
            payload.driver_id,
            payload.vehicle_id,
            payload.route_date,
            payload.distance_estimated,
            payload.duration_estimated_minutes,
        )
        .await?;

    Ok(Json(ApiResponse::success(RouteResponse::from(route))))
}

pub async fn delete_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    user.require_admin()?;

    let repo = RouteRepository::new(state.pool.clone());

    let route = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

    if route.status == "in_progress" {
        return Err(AppError::Conflict(
            "No se puede eliminar una ruta en curso".to_string(),
        ));
    }

    repo.delete(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Ruta eliminada".to_string(),
    )))
}

/// Adjunta una entrega validando la capacidad del vehículo
pub async fn add_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddDeliveryRequest>,
) -> AppResult<Json<ApiResponse<CapacityResponse>>> {
    user.require_admin()?;

    let engine = CapacityEngine::new(state.pool.clone());
    let capacity = engine.add_delivery(id, payload.delivery_id).await?;

    Ok(Json(ApiResponse::success(capacity)))
}

pub async fn remove_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((id, delivery_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CapacityResponse>>> {
    user.require_admin()?;

    let engine = CapacityEngine::new(state.pool.clone());
    let capacity = engine.remove_delivery(id, delivery_id).await?;

    Ok(Json(ApiResponse::success(capacity)))
}

pub async fn route_capacity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CapacityResponse>>> {
    let repo = RouteRepository::new(state.pool.clone());
    find_visible_route(&repo, id, &user).await?;

    let engine = CapacityEngine::new(state.pool.clone());
    let capacity = engine.snapshot(id).await?;

    Ok(Json(ApiResponse::success(capacity)))
}

pub async fn start_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    let lifecycle = RouteLifecycle::new(state.pool.clone());
    let route = lifecycle.start(id, &user.scope()).await?;

    Ok(Json(ApiResponse::success_with_message(
        RouteResponse::from(route),
        "Ruta iniciada".to_string(),
    )))
}

pub async fn complete_route(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompleteRouteRequest>,
) -> AppResult<Json<ApiResponse<RouteResponse>>> {
    let lifecycle = RouteLifecycle::new(state.pool.clone());
    let route = lifecycle
        .complete(
            id,
            payload.distance_actual,
            payload.duration_actual_minutes,
            &user.scope(),
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        RouteResponse::from(route),
        "Ruta completada".to_string(),
    )))
}

pub async fn list_route_deliveries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<DeliveryResponse>>>> {
    let routes = RouteRepository::new(state.pool.clone());
    find_visible_route(&routes, id, &user).await?;

    let deliveries = DeliveryRepository::new(state.pool.clone());
    let items = deliveries.list_by_route(id).await?;

    Ok(Json(ApiResponse::success(
        items.into_iter().map(DeliveryResponse::from).collect(),
    )))
}

/// Dashboard de la ruta: entregas, conteos por estado y capacidad
pub async fn route_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RouteDashboardResponse>>> {
    let routes = RouteRepository::new(state.pool.clone());
    let route = find_visible_route(&routes, id, &user).await?;

    let driver = match route.driver_id {
        Some(driver_id) => {
            DriverRepository::new(state.pool.clone())
                .find_by_id(driver_id)
                .await?
        }
        None => None,
    };

    let vehicle = match route.vehicle_id {
        Some(vehicle_id) => {
            VehicleRepository::new(state.pool.clone())
                .find_by_id(vehicle_id)
                .await?
        }
        None => None,
    };

    let deliveries = DeliveryRepository::new(state.pool.clone())
        .list_by_route(id)
        .await?;

    let stats = DeliveryStatusCounts {
        total: deliveries.len() as i64,
        pending: count_status(&deliveries, "pending"),
        in_transit: count_status(&deliveries, "in_transit"),
        delivered: count_status(&deliveries, "delivered"),
        cancelled: count_status(&deliveries, "cancelled"),
    };

    let engine = CapacityEngine::new(state.pool.clone());
    let capacity = engine.snapshot(id).await?;

    Ok(Json(ApiResponse::success(RouteDashboardResponse {
        route: RouteResponse::from(route),
        driver: driver.map(DriverResponse::from),
        vehicle: vehicle.map(VehicleResponse::from),
        deliveries: deliveries.into_iter().map(DeliveryResponse::from).collect(),
        stats,
        capacity,
    })))
}

fn count_status(deliveries: &[crate::models::delivery::Delivery], status: &str) -> i64 {
    deliveries.iter().filter(|d| d.status == status).count() as i64
}

async fn find_visible_route(
    repo: &RouteRepository,
    id: Uuid,
    user: &AuthenticatedUser,
) -> Result<Route, AppError> {
    let route = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

    match user.scope() {
        AccessScope::Admin => Ok(route),
        AccessScope::Driver(driver_id) if route.driver_id == Some(driver_id) => Ok(route),
        _ => Err(AppError::NotFound("Ruta no encontrada".to_string())),
    }
}
