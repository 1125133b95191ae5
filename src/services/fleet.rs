//! Asignación de flota
//!
//! Un conductor opera a lo sumo un vehículo a la vez: asignarle uno nuevo
//! libera el que tuviera en uso, dentro de la misma transacción.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct FleetService {
    pool: PgPool,
}

impl FleetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Asigna un vehículo disponible a un conductor
    pub async fn assign_vehicle(
        &self,
        driver_id: Uuid,
        vehicle_id: Uuid,
    ) -> Result<Vehicle, AppError> {
        let mut tx = self.pool.begin().await?;

        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(driver_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let vehicle_status = VehicleStatus::from_str(&vehicle.status)
            .ok_or_else(|| AppError::Internal("Estado de vehículo corrupto".to_string()))?;

        if vehicle_status != VehicleStatus::Available {
            return Err(AppError::PreconditionFailed(format!(
                "El vehículo '{}' no está disponible (estado: {})",
                vehicle.plate,
                vehicle_status.label()
            )));
        }

        // Liberar el vehículo que el conductor tuviera en uso
        sqlx::query(
            r#"
            UPDATE vehicles
            SET status = 'available', current_driver_id = NULL
            WHERE current_driver_id = $1 AND status = 'in_use'
            "#,
        )
        .bind(driver_id)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET status = 'in_use', current_driver_id = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(driver_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "🚐 Vehículo {} asignado al conductor {}",
            updated.plate, driver.name
        );

        Ok(updated)
    }

    /// Libera el vehículo en uso de un conductor, si lo tiene
    pub async fn release_vehicle(&self, driver_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET status = 'available', current_driver_id = NULL
            WHERE current_driver_id = $1 AND status = 'in_use'
            RETURNING *
            "#,
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }
}
