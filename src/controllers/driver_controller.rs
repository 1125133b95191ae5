//! Controlador de conductores

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, StatusQuery};
use crate::dto::delivery_dto::{DeliveryResponse, HistoryEntryResponse};
use crate::dto::driver_dto::{
    AssignVehicleRequest, CreateDriverRequest, DriverResponse, ProvisionAccountRequest,
    ProvisionAccountResponse, UpdateDriverRequest,
};
use crate::dto::route_dto::RouteResponse;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::driver::DriverStatus;
use crate::repositories::delivery_repository::DeliveryRepository;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::route_repository::RouteRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::AccessScope;
use crate::services::fleet::FleetService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn create_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateDriverRequest>,
) -> AppResult<Json<ApiResponse<DriverResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = DriverRepository::new(state.pool.clone());

    if repo.cpf_exists(&payload.cpf).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe un conductor con el CPF '{}'",
            payload.cpf
        )));
    }
    if repo.license_number_exists(&payload.license_number).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe un conductor con la licencia '{}'",
            payload.license_number
        )));
    }

    let driver = repo
        .create(
            payload.name,
            payload.cpf,
            payload.license_category,
            payload.license_number,
            payload.phone,
            payload.email,
            payload.birth_date,
        )
        .await?;

    Ok(Json(ApiResponse::success(DriverResponse::from(driver))))
}

pub async fn list_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<StatusQuery>,
) -> AppResult<Json<ApiResponse<Vec<DriverResponse>>>> {
    let repo = DriverRepository::new(state.pool.clone());
    let drivers = repo.list(user.scope(), query.status).await?;

    Ok(Json(ApiResponse::success(
        drivers.into_iter().map(DriverResponse::from).collect(),
    )))
}

/// Perfil del conductor vinculado a la cuenta autenticada
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<DriverResponse>>> {
    let driver_id = user
        .driver_id
        .ok_or_else(|| AppError::NotFound("Cuenta sin conductor vinculado".to_string()))?;

    let repo = DriverRepository::new(state.pool.clone());
    let driver = repo
        .find_by_id(driver_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success(DriverResponse::from(driver))))
}

pub async fn get_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DriverResponse>>> {
    check_driver_access(&user, id)?;

    let repo = DriverRepository::new(state.pool.clone());
    let driver = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    Ok(Json(ApiResponse::success(DriverResponse::from(driver))))
}

pub async fn update_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDriverRequest>,
) -> AppResult<Json<ApiResponse<DriverResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    if let Some(status) = payload.status.as_deref() {
        if DriverStatus::from_str(status).is_none() {
            return Err(AppError::BadRequest(format!(
                "Estado de conductor inválido: '{}'",
                status
            )));
        }
    }

    let repo = DriverRepository::new(state.pool.clone());
    let driver = repo
        .update(
            id,
            payload.name,
            payload.license_category,
            payload.phone,
            payload.email,
            payload.status,
            payload.birth_date,
        )
        .await?;

    Ok(Json(ApiResponse::success(DriverResponse::from(driver))))
}

pub async fn delete_driver(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    user.require_admin()?;

    let repo = DriverRepository::new(state.pool.clone());
    repo.delete(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Conductor eliminado".to_string(),
    )))
}

/// Entregas asignadas a un conductor
pub async fn list_driver_deliveries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<DeliveryResponse>>>> {
    check_driver_access(&user, id)?;

    let repo = DeliveryRepository::new(state.pool.clone());
    let deliveries = repo.list_by_driver(id).await?;

    Ok(Json(ApiResponse::success(
        deliveries.into_iter().map(DeliveryResponse::from).collect(),
    )))
}

/// Rutas asignadas a un conductor
pub async fn list_driver_routes(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<RouteResponse>>>> {
    check_driver_access(&user, id)?;

    let repo = RouteRepository::new(state.pool.clone());
    let routes = repo.list_by_driver(id).await?;

    Ok(Json(ApiResponse::success(
        routes.into_iter().map(RouteResponse::from).collect(),
    )))
}

/// Entradas de historial registradas por un conductor
pub async fn driver_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<HistoryEntryResponse>>>> {
    check_driver_access(&user, id)?;

    let repo = HistoryRepository::new(state.pool.clone());
    let entries = repo.list_by_driver(id).await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(HistoryEntryResponse::from).collect(),
    )))
}

/// Asigna un vehículo disponible al conductor, liberando el anterior
pub async fn assign_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignVehicleRequest>,
) -> AppResult<Json<ApiResponse<VehicleResponse>>> {
    user.require_admin()?;

    let fleet = FleetService::new(state.pool.clone());
    let vehicle = fleet.assign_vehicle(id, payload.vehicle_id).await?;

    Ok(Json(ApiResponse::success(VehicleResponse::from(vehicle))))
}

/// Aprovisiona la cuenta de sistema del conductor.
///
/// El username es el CPF del conductor; una colisión se reporta como
/// Conflict y nunca se reutiliza una cuenta existente.
pub async fn provision_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProvisionAccountRequest>,
) -> AppResult<Json<ApiResponse<ProvisionAccountResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let drivers = DriverRepository::new(state.pool.clone());
    let users = UserRepository::new(state.pool.clone());

    let driver = drivers
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

    if driver.user_id.is_some() {
        return Err(AppError::Conflict(
            "El conductor ya tiene una cuenta vinculada".to_string(),
        ));
    }

    let username = driver.cpf.clone();
    if users.username_exists(&username).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe una cuenta con el username '{}'",
            username
        )));
    }

    let password_hash = state.auth.hash_password(&payload.password)?;
    let account = users
        .create(username, Some(driver.email.clone()), password_hash, false)
        .await?;
    drivers.link_user(id, account.id).await?;

    Ok(Json(ApiResponse::success(ProvisionAccountResponse {
        user_id: account.id,
        username: account.username,
    })))
}

fn check_driver_access(user: &AuthenticatedUser, driver_id: Uuid) -> Result<(), AppError> {
    match user.scope() {
        AccessScope::Admin => Ok(()),
        AccessScope::Driver(own_id) if own_id == driver_id => Ok(()),
        _ => Err(AppError::Forbidden(
            "Solo puede consultar su propio perfil de conductor".to_string(),
        )),
    }
}
