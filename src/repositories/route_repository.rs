use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::route::Route;
use crate::repositories::AccessScope;
use crate::utils::errors::AppError;

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        route_date: NaiveDate,
        distance_estimated: Option<Decimal>,
        duration_estimated_minutes: Option<i32>,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (id, name, description, driver_id, vehicle_id, route_date, status,
                                utilized_capacity, distance_estimated, distance_actual,
                                duration_estimated_minutes, duration_actual_minutes, created_at,
                                started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'planned', 0, $7, 0, $8, 0, $9, NULL, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description.unwrap_or_default())
        .bind(driver_id)
        .bind(vehicle_id)
        .bind(route_date)
        .bind(distance_estimated.unwrap_or_default())
        .bind(duration_estimated_minutes.unwrap_or(0))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Route>, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(route)
    }

    /// Admin ve todas las rutas; un conductor solo las suyas
    pub async fn list(
        &self,
        scope: AccessScope,
        status: Option<String>,
    ) -> Result<Vec<Route>, AppError> {
        let routes = match scope {
            AccessScope::Admin => {
                sqlx::query_as::<_, Route>(
                    r#"
                    SELECT * FROM routes
                    WHERE ($1::text IS NULL OR status = $1)
                    ORDER BY route_date DESC, name
                    "#,
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Driver(driver_id) => {
                sqlx::query_as::<_, Route>(
                    r#"
                    SELECT * FROM routes
                    WHERE driver_id = $1 AND ($2::text IS NULL OR status = $2)
                    ORDER BY route_date DESC, name
                    "#,
                )
                .bind(driver_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Unlinked => Vec::new(),
        };

        Ok(routes)
    }

    pub async fn list_by_driver(&self, driver_id: Uuid) -> Result<Vec<Route>, AppError> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE driver_id = $1 ORDER BY route_date DESC, name",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    /// Rutas de un vehículo; para un conductor, solo sus propias rutas con él
    pub async fn list_by_vehicle(
        &self,
        vehicle_id: Uuid,
        scope: AccessScope,
    ) -> Result<Vec<Route>, AppError> {
        let routes = match scope {
            AccessScope::Admin => {
                sqlx::query_as::<_, Route>(
                    "SELECT * FROM routes WHERE vehicle_id = $1 ORDER BY route_date DESC",
                )
                .bind(vehicle_id)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Driver(driver_id) => {
                sqlx::query_as::<_, Route>(
                    r#"
                    SELECT * FROM routes
                    WHERE vehicle_id = $1 AND driver_id = $2
                    ORDER BY route_date DESC
                    "#,
                )
                .bind(vehicle_id)
                .bind(driver_id)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Unlinked => Vec::new(),
        };

        Ok(routes)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        route_date: Option<NaiveDate>,
        distance_estimated: Option<Decimal>,
        duration_estimated_minutes: Option<i32>,
    ) -> Result<Route, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET name = $2, description = $3, driver_id = $4, vehicle_id = $5, route_date = $6,
                distance_estimated = $7, duration_estimated_minutes = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(description.unwrap_or(current.description))
        .bind(driver_id.or(current.driver_id))
        .bind(vehicle_id.or(current.vehicle_id))
        .bind(route_date.unwrap_or(current.route_date))
        .bind(distance_estimated.unwrap_or(current.distance_estimated))
        .bind(duration_estimated_minutes.unwrap_or(current.duration_estimated_minutes))
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ruta no encontrada".to_string()));
        }

        Ok(())
    }
}
