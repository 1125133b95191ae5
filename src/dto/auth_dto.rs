use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::DriverSummary;

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,

    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

// Request de refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// Información del usuario autenticado incluida en el login
#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub driver: Option<DriverSummary>,
}

// Response de login con el par de tokens
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserInfoResponse,
}

// Response de refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}
