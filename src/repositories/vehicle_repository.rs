use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        plate: String,
        model: String,
        brand: String,
        vehicle_type: String,
        max_capacity: i32,
        manufacture_year: i32,
        odometer: Decimal,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, plate, model, brand, vehicle_type, max_capacity,
                                  manufacture_year, odometer, status, current_driver_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'available', NULL, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plate)
        .bind(model)
        .bind(brand)
        .bind(vehicle_type)
        .bind(max_capacity)
        .bind(manufacture_year)
        .bind(odometer)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self, status: Option<String>) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY plate
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_available(&self) -> Result<Vec<Vehicle>, AppError> {
        self.list(Some("available".to_string())).await
    }

    /// El vehículo que el conductor tiene actualmente en uso, si hay
    pub async fn find_in_use_by_driver(&self, driver_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE current_driver_id = $1 AND status = 'in_use'",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn plate_exists(&self, plate: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE plate = $1)")
                .bind(plate)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        model: Option<String>,
        brand: Option<String>,
        vehicle_type: Option<String>,
        max_capacity: Option<i32>,
        odometer: Option<Decimal>,
        status: Option<String>,
    ) -> Result<Vehicle, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET model = $2, brand = $3, vehicle_type = $4, max_capacity = $5, odometer = $6,
                status = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(model.unwrap_or(current.model))
        .bind(brand.unwrap_or(current.brand))
        .bind(vehicle_type.unwrap_or(current.vehicle_type))
        .bind(max_capacity.unwrap_or(current.max_capacity))
        .bind(odometer.unwrap_or(current.odometer))
        .bind(status.unwrap_or(current.status))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vehículo no encontrado".to_string()));
        }

        Ok(())
    }
}
