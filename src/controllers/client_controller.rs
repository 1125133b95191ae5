//! Controlador de clientes

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::AccessScope;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateClientRequest>,
) -> AppResult<Json<ApiResponse<ClientResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = ClientRepository::new(state.pool.clone());

    if repo.tax_id_exists(&payload.tax_id).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe un cliente con el documento '{}'",
            payload.tax_id
        )));
    }
    if repo.email_exists(&payload.email).await? {
        return Err(AppError::Conflict(format!(
            "Ya existe un cliente con el email '{}'",
            payload.email
        )));
    }

    let client = repo
        .create(
            payload.name,
            payload.email,
            payload.phone,
            payload.tax_id,
            payload.address,
            payload.postal_code,
        )
        .await?;

    Ok(Json(ApiResponse::success(ClientResponse::from(client))))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<ClientResponse>>>> {
    let repo = ClientRepository::new(state.pool.clone());
    let clients = repo.list(user.scope()).await?;

    Ok(Json(ApiResponse::success(
        clients.into_iter().map(ClientResponse::from).collect(),
    )))
}

pub async fn get_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ClientResponse>>> {
    let repo = ClientRepository::new(state.pool.clone());

    let client = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

    // Un conductor solo ve los clientes de sus entregas
    match user.scope() {
        AccessScope::Admin => {}
        AccessScope::Driver(driver_id) => {
            if !repo.visible_to_driver(id, driver_id).await? {
                return Err(AppError::NotFound("Cliente no encontrado".to_string()));
            }
        }
        AccessScope::Unlinked => {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()))
        }
    }

    Ok(Json(ApiResponse::success(ClientResponse::from(client))))
}

pub async fn update_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> AppResult<Json<ApiResponse<ClientResponse>>> {
    user.require_admin()?;
    payload.validate()?;

    let repo = ClientRepository::new(state.pool.clone());
    let client = repo
        .update(
            id,
            payload.email,
            payload.phone,
            payload.address,
            payload.postal_code,
        )
        .await?;

    Ok(Json(ApiResponse::success(ClientResponse::from(client))))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    user.require_admin()?;

    let repo = ClientRepository::new(state.pool.clone());
    repo.delete(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        (),
        "Cliente eliminado".to_string(),
    )))
}
