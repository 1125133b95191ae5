//! Middleware de autenticación JWT
//!
//! Extrae el token Bearer, lo valida, verifica que el usuario exista y
//! deja un `AuthenticatedUser` en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::user::User;
use crate::repositories::AccessScope;
use crate::services::auth_service::TOKEN_TYPE_ACCESS;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
    pub driver_id: Option<Uuid>,
}

impl AuthenticatedUser {
    /// Ámbito de acceso a datos del usuario
    pub fn scope(&self) -> AccessScope {
        if self.is_staff {
            AccessScope::Admin
        } else {
            match self.driver_id {
                Some(driver_id) => AccessScope::Driver(driver_id),
                None => AccessScope::Unlinked,
            }
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Se requieren permisos de administrador".to_string(),
            ))
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let claims = state.auth.validate_token(token)?;

    if claims.token_type != TOKEN_TYPE_ACCESS {
        return Err(AppError::Unauthorized(
            "Se esperaba un token de acceso".to_string(),
        ));
    }

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token con sujeto inválido".to_string()))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    // El vínculo con el conductor se resuelve en cada request, no del token
    let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE user_id = $1")
        .bind(user.id)
        .fetch_optional(&state.pool)
        .await?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        is_staff: user.is_staff,
        driver_id: driver.map(|d| d.id),
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_staff: bool, driver_id: Option<Uuid>) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "test".to_string(),
            is_staff,
            driver_id,
        }
    }

    #[test]
    fn staff_gets_admin_scope() {
        assert!(matches!(user(true, None).scope(), AccessScope::Admin));
        assert!(user(true, None).require_admin().is_ok());
    }

    #[test]
    fn linked_driver_gets_driver_scope() {
        let driver_id = Uuid::new_v4();
        let u = user(false, Some(driver_id));
        assert!(matches!(u.scope(), AccessScope::Driver(id) if id == driver_id));
        assert!(u.require_admin().is_err());
    }

    #[test]
    fn unlinked_account_gets_empty_scope() {
        assert!(matches!(user(false, None).scope(), AccessScope::Unlinked));
    }
}
