//! Controlador de entregas
//!
//! Incluye el rastreo público por código, único camino sin autenticación
//! de toda la API.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, StatusQuery};
use crate::dto::delivery_dto::{
    AssignDriverRequest, CreateDeliveryRequest, DeliveryResponse, HistoryEntryResponse,
    PublicTrackingResponse, TrackingDetailResponse, TrackingQuery, UpdateDeliveryRequest,
    UpdateStatusRequest,
};
use crate::dto::driver_dto::DriverResponse;
use crate::dto::route_dto::RouteResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::delivery::Delivery;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::delivery_repository::DeliveryRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::repositories::AccessScope;
use crate::services::delivery_lifecycle::DeliveryLifecycle;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn create_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDeliveryRequest>,
) -> AppResult<Json<ApiResponse<DeliveryResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let clients = ClientRepository::new(state.pool.clone());
    if clients.find_by_id(payload.client_id).await?.is_none() {
        return Err(AppError::BadRequest(
            "El cliente indicado no existe".to_string(),
        ));
    }

    let repo = DeliveryRepository::new(state.pool.clone());
    let delivery = repo
        .create(
            payload.client_id,
            payload.origin_address,
            payload.destination_address,
            payload.origin_postal_code,
            payload.destination_postal_code,
            payload.required_capacity,
            payload.freight_value,
            payload.expected_date,
            payload.notes,
        )
        .await?;

    Ok(Json(ApiResponse::success(DeliveryResponse::from(delivery))))
}

pub async fn list_deliveries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<DeliveryResponse>>>> {
    let repo = DeliveryRepository::new(state.pool.clone());
    let deliveries = repo.list(user.scope(), query.status).await?;

    Ok(Json(ApiResponse::success(
        deliveries.into_iter().map(DeliveryResponse::from).collect(),
    )))
}

pub async fn get_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DeliveryResponse>>> {
    let repo = DeliveryRepository::new(state.pool.clone());
    let delivery = find_visible_delivery(&repo, id, &user).await?;

    Ok(Json(ApiResponse::success(DeliveryResponse::from(delivery))))
}

pub async fn update_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDeliveryRequest>,
) -> AppResult<Json<ApiResponse<DeliveryResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = DeliveryRepository::new(state.pool.clone());
    let delivery = repo
        .update(
            id,
            payload.origin_address,
            payload.destination_address,
            payload.required_capacity,
            payload.freight_value,
            payload.expected_date,
            payload.notes,
        )
        .await?;

    Ok(Json(ApiResponse::success(DeliveryResponse::from(delivery))))
}

pub async fn delete_delivery(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    user.require_admin()?;

    let repo = DeliveryRepository::new(state.pool.clone());
    repo.delete(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Entrega eliminada".to_string(),
    )))
}

/// Cambio de estado con registro de historial
pub async fn update_delivery_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<DeliveryResponse>>> {
    let lifecycle = DeliveryLifecycle::new(state.pool.clone());
    let delivery = lifecycle
        .update_status(id, &payload.status, payload.note, &user.scope())
        .await?;

    Ok(Json(ApiResponse::success(DeliveryResponse::from(delivery))))
}

pub async fn assign_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignDriverRequest>,
) -> AppResult<Json<ApiResponse<DeliveryResponse>>> {
    user.require_admin()?;

    let lifecycle = DeliveryLifecycle::new(state.pool.clone());
    let delivery = lifecycle.assign_driver(id, payload.driver_id).await?;

    Ok(Json(ApiResponse::success(DeliveryResponse::from(delivery))))
}

pub async fn delivery_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<HistoryEntryResponse>>>> {
    let deliveries = DeliveryRepository::new(state.pool.clone());
    find_visible_delivery(&deliveries, id, &user).await?;

    let history = HistoryRepository::new(state.pool.clone());
    let entries = history.list_by_delivery(id).await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(HistoryEntryResponse::from).collect(),
    )))
}

/// Rastreo público por código, sin autenticación
pub async fn public_tracking(
    State(state): State<AppState>,
    Query(query): Query<TrackingQuery>,
) -> AppResult<Json<ApiResponse<PublicTrackingResponse>>> {
    let code = normalize_code(query.code)?;

    let deliveries = DeliveryRepository::new(state.pool.clone());
    let delivery = deliveries
        .find_by_tracking_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Código de rastreo no encontrado".to_string()))?;

    let history = HistoryRepository::new(state.pool.clone());
    let entries = history.list_by_delivery(delivery.id).await?;

    Ok(Json(ApiResponse::success(PublicTrackingResponse {
        delivery: DeliveryResponse::from(delivery),
        history: entries.into_iter().map(HistoryEntryResponse::from).collect(),
    })))
}

/// Rastreo autenticado con el contexto completo de la ruta
pub async fn tracking_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TrackingDetailResponse>>> {
    let deliveries = DeliveryRepository::new(state.pool.clone());
    let delivery = find_visible_delivery(&deliveries, id, &user).await?;

    let route = match delivery.route_id {
        Some(route_id) => {
            RouteRepository::new(state.pool.clone())
                .find_by_id(route_id)
                .await?
        }
        None => None,
    };

    let vehicle = match route.as_ref().and_then(|r| r.vehicle_id) {
        Some(vehicle_id) => {
            VehicleRepository::new(state.pool.clone())
                .find_by_id(vehicle_id)
                .await?
        }
        None => None,
    };

    let driver = match delivery.driver_id {
        Some(driver_id) => {
            DriverRepository::new(state.pool.clone())
                .find_by_id(driver_id)
                .await?
        }
        None => None,
    };

    // La siguiente parada pendiente de la misma ruta
    let next_delivery = match delivery.route_id {
        Some(route_id) => {
            let route_deliveries = deliveries.list_by_route(route_id).await?;
            route_deliveries
                .into_iter()
                .skip_while(|d| d.id != delivery.id)
                .skip(1)
                .find(|d| matches!(d.status.as_str(), "pending" | "in_transit" | "rescheduled"))
        }
        None => None,
    };

    let history = HistoryRepository::new(state.pool.clone());
    let entries = history.list_by_delivery(delivery.id).await?;

    Ok(Json(ApiResponse::success(TrackingDetailResponse {
        delivery: DeliveryResponse::from(delivery),
        route: route.map(RouteResponse::from),
        vehicle: vehicle.map(VehicleResponse::from),
        driver: driver.map(DriverResponse::from),
        history: entries.into_iter().map(HistoryEntryResponse::from).collect(),
        next_delivery: next_delivery.map(DeliveryResponse::from),
    })))
}

fn normalize_code(code: Option<String>) -> Result<String, AppError> {
    let code = code
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("El parámetro 'code' es obligatorio".to_string())
        })?;
    Ok(code)
}

fn check_delivery_access(delivery: &Delivery, user: &AuthenticatedUser) -> Result<(), AppError> {
    match user.scope() {
        AccessScope::Admin => Ok(()),
        AccessScope::Driver(driver_id) if delivery.driver_id == Some(driver_id) => Ok(()),
        _ => Err(AppError::NotFound("Entrega no encontrada".to_string())),
    }
}

async fn find_visible_delivery(
    repo: &DeliveryRepository,
    id: Uuid,
    user: &AuthenticatedUser,
) -> Result<Delivery, AppError> {
    let delivery = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

    check_delivery_access(&delivery, user)?;

    Ok(delivery)
}
