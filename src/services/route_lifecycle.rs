//! Ciclo de vida de rutas
//!
//! Iniciar y completar una ruta arrastra cambios en el conductor, el
//! vehículo y las entregas adjuntas. Cada operación se confirma en una
//! única transacción.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::route::{Route, RouteStatus};
use crate::repositories::AccessScope;
use crate::utils::errors::AppError;

pub struct RouteLifecycle {
    pool: PgPool,
}

impl RouteLifecycle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inicia una ruta planificada.
    ///
    /// Cascada: el conductor pasa a `en_route`, el vehículo a `in_use` y
    /// las entregas pendientes de la ruta a `in_transit` en bloque. El
    /// arranque masivo no escribe entradas de historial por entrega.
    pub async fn start(&self, route_id: Uuid, scope: &AccessScope) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        Self::check_route_access(&route, scope)?;

        let status = RouteStatus::from_str(&route.status)
            .ok_or_else(|| AppError::Internal("Estado de ruta corrupto".to_string()))?;

        if status != RouteStatus::Planned {
            return Err(AppError::PreconditionFailed(format!(
                "Solo una ruta planificada puede iniciarse (estado actual: {})",
                status.label()
            )));
        }

        let driver_id = route.driver_id.ok_or_else(|| {
            AppError::PreconditionFailed("La ruta no tiene conductor asignado".to_string())
        })?;
        let vehicle_id = route.vehicle_id.ok_or_else(|| {
            AppError::PreconditionFailed("La ruta no tiene vehículo asignado".to_string())
        })?;

        let updated = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET status = 'in_progress', started_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE drivers SET status = 'en_route' WHERE id = $1")
            .bind(driver_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE vehicles SET status = 'in_use', current_driver_id = $2 WHERE id = $1")
            .bind(vehicle_id)
            .bind(driver_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE deliveries SET status = 'in_transit' WHERE route_id = $1 AND status = 'pending'",
        )
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("🛣️ Ruta '{}' iniciada", updated.name);

        Ok(updated)
    }

    /// Completa una ruta en curso.
    ///
    /// Los valores reales reemplazan a los registrados si vienen en la
    /// petición; el odómetro del vehículo avanza la distancia real final.
    pub async fn complete(
        &self,
        route_id: Uuid,
        distance_actual: Option<Decimal>,
        duration_actual_minutes: Option<i32>,
        scope: &AccessScope,
    ) -> Result<Route, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        Self::check_route_access(&route, scope)?;

        let status = RouteStatus::from_str(&route.status)
            .ok_or_else(|| AppError::Internal("Estado de ruta corrupto".to_string()))?;

        if status != RouteStatus::InProgress {
            return Err(AppError::PreconditionFailed(format!(
                "Solo una ruta en curso puede completarse (estado actual: {})",
                status.label()
            )));
        }

        let distance_actual = distance_actual.unwrap_or(route.distance_actual);
        let duration_actual_minutes = duration_actual_minutes.unwrap_or(route.duration_actual_minutes);

        let updated = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET status = 'completed', completed_at = $2, distance_actual = $3,
                duration_actual_minutes = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(route_id)
        .bind(Utc::now())
        .bind(distance_actual)
        .bind(duration_actual_minutes)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(driver_id) = route.driver_id {
            sqlx::query("UPDATE drivers SET status = 'available' WHERE id = $1")
                .bind(driver_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(vehicle_id) = route.vehicle_id {
            sqlx::query(
                "UPDATE vehicles SET status = 'available', odometer = odometer + $2 WHERE id = $1",
            )
            .bind(vehicle_id)
            .bind(distance_actual)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "🏁 Ruta '{}' completada ({} km)",
            updated.name, distance_actual
        );

        Ok(updated)
    }

    /// Admin o el propio conductor de la ruta
    fn check_route_access(route: &Route, scope: &AccessScope) -> Result<(), AppError> {
        match scope {
            AccessScope::Admin => Ok(()),
            AccessScope::Driver(driver_id) if route.driver_id == Some(*driver_id) => Ok(()),
            _ => Err(AppError::Forbidden(
                "Esta ruta no está asignada a su conductor".to_string(),
            )),
        }
    }
}
