//! Ciclo de vida de entregas
//!
//! Todo cambio de estado y toda asignación de conductor pasan por aquí:
//! el cambio y su entrada de historial se confirman en la misma
//! transacción, de modo que nunca existe un cambio sin rastro.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::models::driver::{Driver, DriverStatus};
use crate::repositories::history_repository::{HistoryRepository, NewHistoryEntry};
use crate::repositories::AccessScope;
use crate::utils::errors::AppError;

/// Transiciones permitidas a un conductor. Un admin no tiene restricción.
pub fn driver_can_transition(from: DeliveryStatus, to: DeliveryStatus) -> bool {
    matches!(
        (from, to),
        (DeliveryStatus::Pending, DeliveryStatus::InTransit)
            | (DeliveryStatus::InTransit, DeliveryStatus::Delivered)
            | (DeliveryStatus::InTransit, DeliveryStatus::Rescheduled)
            | (DeliveryStatus::Rescheduled, DeliveryStatus::InTransit)
    )
}

/// `delivered_at` se fija en la primera llegada a 'delivered' y nunca
/// se resetea ni se sobrescribe
pub fn delivered_at_after(
    new_status: DeliveryStatus,
    existing: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (new_status, existing) {
        (DeliveryStatus::Delivered, None) => Some(Utc::now()),
        (_, existing) => existing,
    }
}

pub struct DeliveryLifecycle {
    pool: PgPool,
}

impl DeliveryLifecycle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cambia el estado de una entrega y registra el historial.
    ///
    /// Un conductor solo puede operar sobre sus propias entregas y dentro
    /// del conjunto de transiciones permitido. `delivered_at` se fija una
    /// sola vez, en la primera transición a `delivered`.
    pub async fn update_status(
        &self,
        delivery_id: Uuid,
        new_status_raw: &str,
        note: Option<String>,
        scope: &AccessScope,
    ) -> Result<Delivery, AppError> {
        let new_status = DeliveryStatus::from_str(new_status_raw).ok_or_else(|| {
            AppError::BadRequest(format!("Estado de entrega inválido: '{}'", new_status_raw))
        })?;

        let mut tx = self.pool.begin().await?;

        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(delivery_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

        let current = DeliveryStatus::from_str(&delivery.status)
            .ok_or_else(|| AppError::Internal("Estado de entrega corrupto".to_string()))?;

        let actor_driver_id = match scope {
            AccessScope::Admin => None,
            AccessScope::Driver(driver_id) => {
                if delivery.driver_id != Some(*driver_id) {
                    return Err(AppError::Forbidden(
                        "Esta entrega no está asignada a su conductor".to_string(),
                    ));
                }
                if !driver_can_transition(current, new_status) {
                    return Err(AppError::Forbidden(format!(
                        "Transición no permitida: {} -> {}",
                        current.as_str(),
                        new_status.as_str()
                    )));
                }
                Some(*driver_id)
            }
            AccessScope::Unlinked => {
                return Err(AppError::Forbidden(
                    "Cuenta sin conductor vinculado".to_string(),
                ))
            }
        };

        let delivered_at = delivered_at_after(new_status, delivery.delivered_at);

        let updated = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries
            SET status = $2, delivered_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(delivery_id)
        .bind(new_status.as_str())
        .bind(delivered_at)
        .fetch_one(&mut *tx)
        .await?;

        HistoryRepository::insert(
            &mut *tx,
            NewHistoryEntry {
                delivery_id,
                previous_status: current.as_str().to_string(),
                new_status: new_status.as_str().to_string(),
                note: note.unwrap_or_default(),
                driver_id: actor_driver_id.or(delivery.driver_id),
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            "🚚 Entrega {}: {} -> {}",
            updated.tracking_code,
            current.as_str(),
            new_status.as_str()
        );

        Ok(updated)
    }

    /// Asigna un conductor a una entrega.
    ///
    /// El conductor debe poder recibir entregas; el evento se registra en
    /// el historial con estado anterior y nuevo idénticos.
    pub async fn assign_driver(
        &self,
        delivery_id: Uuid,
        driver_id: Uuid,
    ) -> Result<Delivery, AppError> {
        let mut tx = self.pool.begin().await?;

        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(delivery_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(driver_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let driver_status = DriverStatus::from_str(&driver.status)
            .ok_or_else(|| AppError::Internal("Estado de conductor corrupto".to_string()))?;

        if !driver_status.can_take_deliveries() {
            return Err(AppError::PreconditionFailed(format!(
                "El conductor '{}' no puede recibir entregas (estado: {})",
                driver.name,
                driver_status.label()
            )));
        }

        let updated = sqlx::query_as::<_, Delivery>(
            "UPDATE deliveries SET driver_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(delivery_id)
        .bind(driver_id)
        .fetch_one(&mut *tx)
        .await?;

        HistoryRepository::insert(
            &mut *tx,
            NewHistoryEntry {
                delivery_id,
                previous_status: delivery.status.clone(),
                new_status: delivery.status.clone(),
                note: format!("Conductor asignado: {}", driver.name),
                driver_id: Some(driver_id),
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            "👤 Conductor {} asignado a la entrega {}",
            driver.name, updated.tracking_code
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::delivery::DeliveryStatus::*;

    #[test]
    fn driver_allow_list_matches_operational_flow() {
        assert!(driver_can_transition(Pending, InTransit));
        assert!(driver_can_transition(InTransit, Delivered));
        assert!(driver_can_transition(InTransit, Rescheduled));
        assert!(driver_can_transition(Rescheduled, InTransit));
    }

    #[test]
    fn driver_cannot_cancel_nor_revert() {
        assert!(!driver_can_transition(Pending, Cancelled));
        assert!(!driver_can_transition(InTransit, Cancelled));
        assert!(!driver_can_transition(Delivered, Pending));
        assert!(!driver_can_transition(Delivered, InTransit));
        assert!(!driver_can_transition(Pending, Delivered));
        assert!(!driver_can_transition(Cancelled, InTransit));
    }

    #[test]
    fn delivered_at_set_on_first_arrival() {
        assert!(delivered_at_after(Delivered, None).is_some());
    }

    #[test]
    fn delivered_at_never_overwritten() {
        let original = Utc::now() - chrono::Duration::hours(3);

        // Una segunda llegada a 'delivered' conserva la marca original
        assert_eq!(delivered_at_after(Delivered, Some(original)), Some(original));
        // Salir y volver tampoco la toca
        assert_eq!(
            delivered_at_after(Rescheduled, Some(original)),
            Some(original)
        );
    }

    #[test]
    fn delivered_at_untouched_by_other_statuses() {
        assert_eq!(delivered_at_after(InTransit, None), None);
        assert_eq!(delivered_at_after(Cancelled, None), None);
    }
}
