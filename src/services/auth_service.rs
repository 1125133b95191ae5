//! Emisión y validación de tokens JWT
//!
//! Par access/refresh firmado con HS256. El claim `token_type` distingue
//! ambos: el middleware solo acepta tokens `access`, y el refresh solo
//! acepta tokens `refresh`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::user::{Claims, User};
use crate::utils::errors::AppError;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_duration: Duration,
    refresh_duration: Duration,
}

impl AuthService {
    pub fn new(secret: &str, access_hours: i64, refresh_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_duration: Duration::hours(access_hours),
            refresh_duration: Duration::days(refresh_days),
        }
    }

    /// Verifica las credenciales contra el hash bcrypt almacenado
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, password_hash)
            .map_err(|e| AppError::Internal(format!("Error verificando contraseña: {}", e)))
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error generando hash: {}", e)))
    }

    /// Genera un token de acceso
    pub fn generate_access_token(
        &self,
        user: &User,
        driver_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        self.generate_token(user, driver_id, TOKEN_TYPE_ACCESS, self.access_duration)
    }

    /// Genera un token de refresco
    pub fn generate_refresh_token(
        &self,
        user: &User,
        driver_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        self.generate_token(user, driver_id, TOKEN_TYPE_REFRESH, self.refresh_duration)
    }

    fn generate_token(
        &self,
        user: &User,
        driver_id: Option<Uuid>,
        token_type: &str,
        duration: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_staff: user.is_staff,
            driver_id: driver_id.map(|id| id.to_string()),
            token_type: token_type.to_string(),
            exp: (now + duration).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
    }

    /// Valida firma y expiración, y devuelve los claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Token inválido o expirado".to_string()))
    }

    /// Valida un token de refresco y devuelve el id del usuario
    pub fn validate_refresh_token(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(AppError::Unauthorized(
                "Se esperaba un token de refresco".to_string(),
            ));
        }

        Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Token con sujeto inválido".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: Some("admin@example.com".to_string()),
            password_hash: String::new(),
            is_staff: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_round_trip() {
        let service = AuthService::new("test-secret", 24, 7);
        let user = test_user();

        let token = service.generate_access_token(&user, None).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(claims.is_staff);
        assert!(claims.driver_id.is_none());
    }

    #[test]
    fn refresh_validation_rejects_access_tokens() {
        let service = AuthService::new("test-secret", 24, 7);
        let user = test_user();

        let access = service.generate_access_token(&user, None).unwrap();
        assert!(service.validate_refresh_token(&access).is_err());

        let refresh = service.generate_refresh_token(&user, None).unwrap();
        assert_eq!(service.validate_refresh_token(&refresh).unwrap(), user.id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = AuthService::new("test-secret", 24, 7);
        let other = AuthService::new("other-secret", 24, 7);
        let user = test_user();

        let token = service.generate_access_token(&user, None).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn password_hash_round_trip() {
        let service = AuthService::new("test-secret", 24, 7);
        let hash = service.hash_password("secreto123").unwrap();
        assert!(service.verify_password("secreto123", &hash).unwrap());
        assert!(!service.verify_password("otro", &hash).unwrap());
    }
}
