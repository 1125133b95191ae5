//! Controlador de autenticación

use axum::{extract::State, Extension, Json};
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfoResponse,
};
use crate::dto::common::ApiResponse;
use crate::dto::driver_dto::DriverSummary;
use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::driver_repository::DriverRepository;
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    payload.validate()?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

    if !state
        .auth
        .verify_password(&payload.password, &user.password_hash)?
    {
        return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
    }

    let drivers = DriverRepository::new(state.pool.clone());
    let driver = drivers.find_by_user_id(user.id).await?;
    let driver_id = driver.as_ref().map(|d| d.id);

    let access = state.auth.generate_access_token(&user, driver_id)?;
    let refresh = state.auth.generate_refresh_token(&user, driver_id)?;

    info!("🔐 Login de '{}'", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        access,
        refresh,
        user: UserInfoResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_staff: user.is_staff,
            driver: driver.map(|d| DriverSummary {
                id: d.id,
                name: d.name,
                status: d.status,
            }),
        },
    })))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<RefreshResponse>>> {
    let user_id = state.auth.validate_refresh_token(&payload.refresh_token)?;

    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let drivers = DriverRepository::new(state.pool.clone());
    let driver_id = drivers.find_by_user_id(user.id).await?.map(|d| d.id);

    let access = state.auth.generate_access_token(&user, driver_id)?;

    Ok(Json(ApiResponse::success(RefreshResponse { access })))
}

/// Información del usuario autenticado
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<UserInfoResponse>>> {
    let users = UserRepository::new(state.pool.clone());
    let user = users
        .find_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    let drivers = DriverRepository::new(state.pool.clone());
    let driver = drivers.find_by_user_id(user.id).await?;

    Ok(Json(ApiResponse::success(UserInfoResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        is_staff: user.is_staff,
        driver: driver.map(|d| DriverSummary {
            id: d.id,
            name: d.name,
            status: d.status,
        }),
    })))
}
