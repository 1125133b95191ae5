//! Modelo de usuario del sistema y claims JWT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Usuario del sistema - mapea exactamente a la tabla users
///
/// `is_staff` distingue administradores de cuentas vinculadas a conductores.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub is_staff: bool,
    pub driver_id: Option<String>,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}
