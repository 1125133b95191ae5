//! Motor de capacidad de rutas
//!
//! `routes.utilized_capacity` es un agregado derivado de las entregas
//! adjuntas. Este módulo es el único que lo escribe: toda mutación del
//! set de entregas pasa por aquí y recalcula el agregado en la misma
//! transacción, de modo que el chequeo, la adjunción y el recálculo no
//! son observables por separado.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::dto::route_dto::CapacityResponse;
use crate::models::delivery::Delivery;
use crate::models::route::Route;
use crate::utils::errors::AppError;

/// Capacidad restante dado el agregado actual y el máximo del vehículo.
/// Sin vehículo asignado no hay límite que reportar: devuelve 0.
pub fn available_capacity(utilized: i32, max_capacity: Option<i32>) -> i32 {
    match max_capacity {
        Some(max) => (max - utilized).max(0),
        None => 0,
    }
}

/// Una entrega cabe si la ruta no tiene vehículo, o si el agregado más
/// la capacidad requerida no supera el máximo del vehículo
pub fn can_add(utilized: i32, required: i32, max_capacity: Option<i32>) -> bool {
    match max_capacity {
        Some(max) => utilized + required <= max,
        None => true,
    }
}

/// Porcentaje de utilización; 0.0 sin vehículo o con máximo 0
pub fn utilization_percent(utilized: i32, max_capacity: Option<i32>) -> f64 {
    match max_capacity {
        Some(max) if max > 0 => f64::from(utilized) / f64::from(max) * 100.0,
        _ => 0.0,
    }
}

/// Ruta que pierde la entrega cuando esta se mueve a `target`.
/// El agregado de esa ruta también debe recalcularse.
pub fn displaced_route(current: Option<Uuid>, target: Uuid) -> Option<Uuid> {
    current.filter(|&route_id| route_id != target)
}

/// Cierto si el agregado ya supera el máximo del vehículo
pub fn over_capacity(utilized: i32, max_capacity: Option<i32>) -> bool {
    matches!(max_capacity, Some(max) if utilized > max)
}

pub struct CapacityEngine {
    pool: PgPool,
}

impl CapacityEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Suma autoritativa de capacidad requerida sobre las entregas de la ruta
    pub async fn recompute(conn: &mut PgConnection, route_id: Uuid) -> Result<i32, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(required_capacity), 0) FROM deliveries WHERE route_id = $1",
        )
        .bind(route_id)
        .fetch_one(conn)
        .await?;

        Ok(total as i32)
    }

    /// Recalcula y persiste el agregado de la ruta
    pub async fn refresh(conn: &mut PgConnection, route_id: Uuid) -> Result<i32, AppError> {
        let utilized = Self::recompute(&mut *conn, route_id).await?;

        sqlx::query("UPDATE routes SET utilized_capacity = $2 WHERE id = $1")
            .bind(route_id)
            .bind(utilized)
            .execute(conn)
            .await?;

        Ok(utilized)
    }

    /// Adjunta una entrega a la ruta validando la capacidad del vehículo.
    ///
    /// Rechaza con `CapacityExceeded` sin dejar estado parcial: el rechazo
    /// ocurre antes del commit y la transacción se revierte entera.
    pub async fn add_delivery(
        &self,
        route_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<CapacityResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(delivery_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

        let max_capacity = self.vehicle_max_capacity(&mut *tx, route.vehicle_id).await?;
        let utilized = Self::recompute(&mut *tx, route_id).await?;

        // Re-adjuntar una entrega ya presente solo recalcula el agregado
        if delivery.route_id != Some(route_id) {
            if !can_add(utilized, delivery.required_capacity, max_capacity) {
                return Err(AppError::CapacityExceeded {
                    required: delivery.required_capacity,
                    available: available_capacity(utilized, max_capacity),
                });
            }

            sqlx::query("UPDATE deliveries SET route_id = $2 WHERE id = $1")
                .bind(delivery_id)
                .bind(route_id)
                .execute(&mut *tx)
                .await?;

            // La ruta que pierde la entrega también actualiza su agregado
            if let Some(former) = displaced_route(delivery.route_id, route_id) {
                Self::refresh(&mut *tx, former).await?;
            }
        }

        let utilized = Self::refresh(&mut *tx, route_id).await?;

        tx.commit().await?;

        info!(
            "📦 Entrega {} añadida a la ruta {} (utilizada: {})",
            delivery.tracking_code, route.name, utilized
        );

        Ok(CapacityResponse {
            max_capacity: max_capacity.unwrap_or(0),
            utilized_capacity: utilized,
            available_capacity: available_capacity(utilized, max_capacity),
            utilization_percent: utilization_percent(utilized, max_capacity),
        })
    }

    /// Quita una entrega de la ruta y recalcula el agregado.
    ///
    /// La remoción explícita de una entrega que no está en la ruta falla
    /// con NotFound; el recálculo masivo, en cambio, ignora ausencias.
    pub async fn remove_delivery(
        &self,
        route_id: Uuid,
        delivery_id: Uuid,
    ) -> Result<CapacityResponse, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let result = sqlx::query(
            "UPDATE deliveries SET route_id = NULL WHERE id = $1 AND route_id = $2",
        )
        .bind(delivery_id)
        .bind(route_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Entrega no encontrada en esta ruta".to_string(),
            ));
        }

        let utilized = Self::refresh(&mut *tx, route_id).await?;
        let max_capacity = self.vehicle_max_capacity(&mut *tx, route.vehicle_id).await?;

        tx.commit().await?;

        Ok(CapacityResponse {
            max_capacity: max_capacity.unwrap_or(0),
            utilized_capacity: utilized,
            available_capacity: available_capacity(utilized, max_capacity),
            utilization_percent: utilization_percent(utilized, max_capacity),
        })
    }

    /// Adjunta el set inicial de entregas al crear una ruta
    pub async fn attach_initial_deliveries(
        &self,
        route_id: Uuid,
        delivery_ids: &[Uuid],
    ) -> Result<i32, AppError> {
        let mut tx = self.pool.begin().await?;

        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let mut former_routes: Vec<Uuid> = Vec::new();

        for delivery_id in delivery_ids {
            let delivery =
                sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
                    .bind(delivery_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Entrega '{}' no encontrada", delivery_id))
                    })?;

            sqlx::query("UPDATE deliveries SET route_id = $2 WHERE id = $1")
                .bind(delivery_id)
                .bind(route_id)
                .execute(&mut *tx)
                .await?;

            if let Some(former) = displaced_route(delivery.route_id, route_id) {
                if !former_routes.contains(&former) {
                    former_routes.push(former);
                }
            }
        }

        // Las rutas que perdieron entregas recalculan su agregado en la
        // misma transacción
        for former in former_routes {
            Self::refresh(&mut *tx, former).await?;
        }

        let utilized = Self::refresh(&mut *tx, route_id).await?;
        let max_capacity = self.vehicle_max_capacity(&mut *tx, route.vehicle_id).await?;

        if over_capacity(utilized, max_capacity) {
            return Err(AppError::CapacityExceeded {
                required: utilized,
                available: max_capacity.unwrap_or(0),
            });
        }

        tx.commit().await?;

        Ok(utilized)
    }

    /// Snapshot de capacidad para la API
    pub async fn snapshot(&self, route_id: Uuid) -> Result<CapacityResponse, AppError> {
        let route = sqlx::query_as::<_, Route>("SELECT * FROM routes WHERE id = $1")
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Ruta no encontrada".to_string()))?;

        let max_capacity = match route.vehicle_id {
            Some(vehicle_id) => sqlx::query_scalar::<_, i32>(
                "SELECT max_capacity FROM vehicles WHERE id = $1",
            )
            .bind(vehicle_id)
            .fetch_optional(&self.pool)
            .await?,
            None => None,
        };

        Ok(CapacityResponse {
            max_capacity: max_capacity.unwrap_or(0),
            utilized_capacity: route.utilized_capacity,
            available_capacity: available_capacity(route.utilized_capacity, max_capacity),
            utilization_percent: utilization_percent(route.utilized_capacity, max_capacity),
        })
    }

    async fn vehicle_max_capacity(
        &self,
        conn: &mut PgConnection,
        vehicle_id: Option<Uuid>,
    ) -> Result<Option<i32>, AppError> {
        match vehicle_id {
            Some(id) => {
                let max = sqlx::query_scalar::<_, i32>(
                    "SELECT max_capacity FROM vehicles WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(conn)
                .await?;
                Ok(max)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_add_without_vehicle_is_unbounded() {
        assert!(can_add(0, 1000, None));
        assert!(can_add(999, 1000, None));
    }

    #[test]
    fn can_add_respects_vehicle_max() {
        // Escenario del vehículo de 50: 30 entra, 30+30 no
        assert!(can_add(0, 30, Some(50)));
        assert!(!can_add(30, 30, Some(50)));
        // Llenar exactamente hasta el máximo es válido
        assert!(can_add(30, 20, Some(50)));
    }

    #[test]
    fn available_capacity_never_negative() {
        assert_eq!(available_capacity(30, Some(50)), 20);
        assert_eq!(available_capacity(60, Some(50)), 0);
        assert_eq!(available_capacity(30, None), 0);
    }

    #[test]
    fn moving_a_delivery_flags_its_former_route_for_refresh() {
        let route_a = Uuid::new_v4();
        let route_b = Uuid::new_v4();

        assert_eq!(displaced_route(Some(route_a), route_b), Some(route_a));
        assert_eq!(displaced_route(Some(route_b), route_b), None);
        assert_eq!(displaced_route(None, route_b), None);
    }

    #[test]
    fn over_capacity_only_past_the_vehicle_max() {
        assert!(over_capacity(51, Some(50)));
        assert!(!over_capacity(50, Some(50)));
        assert!(!over_capacity(1000, None));
    }

    #[test]
    fn utilization_percent_guards_division() {
        assert_eq!(utilization_percent(25, Some(50)), 50.0);
        assert_eq!(utilization_percent(50, Some(50)), 100.0);
        assert_eq!(utilization_percent(10, Some(0)), 0.0);
        assert_eq!(utilization_percent(10, None), 0.0);
        assert_eq!(utilization_percent(0, Some(50)), 0.0);
    }
}
