//! Estado compartido de la aplicación

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::services::auth_service::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let auth = AuthService::new(
            &config.jwt_secret,
            config.jwt_access_hours,
            config.jwt_refresh_days,
        );
        Self { pool, config, auth }
    }
}
