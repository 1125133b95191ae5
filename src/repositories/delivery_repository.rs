use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::delivery::Delivery;
use crate::repositories::AccessScope;
use crate::services::capacity::{over_capacity, CapacityEngine};
use crate::utils::errors::AppError;
use crate::utils::tracking::generate_tracking_code;

pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea la entrega con código de rastreo generado y estado pendiente
    pub async fn create(
        &self,
        client_id: Uuid,
        origin_address: String,
        destination_address: String,
        origin_postal_code: Option<String>,
        destination_postal_code: String,
        required_capacity: i32,
        freight_value: Decimal,
        expected_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Delivery, AppError> {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (id, tracking_code, client_id, origin_address,
                                    destination_address, origin_postal_code,
                                    destination_postal_code, status, required_capacity,
                                    freight_value, requested_at, expected_date, delivered_at,
                                    notes, driver_id, route_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $9, $10, $11, NULL, $12, NULL, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(generate_tracking_code())
        .bind(client_id)
        .bind(origin_address)
        .bind(destination_address)
        .bind(origin_postal_code.unwrap_or_else(|| "00000-000".to_string()))
        .bind(destination_postal_code)
        .bind(required_capacity)
        .bind(freight_value)
        .bind(Utc::now())
        .bind(expected_date)
        .bind(notes.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(delivery)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Delivery>, AppError> {
        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(delivery)
    }

    pub async fn find_by_tracking_code(&self, code: &str) -> Result<Option<Delivery>, AppError> {
        let delivery =
            sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE tracking_code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(delivery)
    }

    /// Admin ve todas las entregas; un conductor solo las suyas
    pub async fn list(
        &self,
        scope: AccessScope,
        status: Option<String>,
    ) -> Result<Vec<Delivery>, AppError> {
        let deliveries = match scope {
            AccessScope::Admin => {
                sqlx::query_as::<_, Delivery>(
                    r#"
                    SELECT * FROM deliveries
                    WHERE ($1::text IS NULL OR status = $1)
                    ORDER BY requested_at DESC
                    "#,
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Driver(driver_id) => {
                sqlx::query_as::<_, Delivery>(
                    r#"
                    SELECT * FROM deliveries
                    WHERE driver_id = $1 AND ($2::text IS NULL OR status = $2)
                    ORDER BY requested_at DESC
                    "#,
                )
                .bind(driver_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Unlinked => Vec::new(),
        };

        Ok(deliveries)
    }

    pub async fn list_by_driver(&self, driver_id: Uuid) -> Result<Vec<Delivery>, AppError> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE driver_id = $1 ORDER BY requested_at DESC",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Entregas de una ruta, en orden estable de adjunción
    pub async fn list_by_route(&self, route_id: Uuid) -> Result<Vec<Delivery>, AppError> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            "SELECT * FROM deliveries WHERE route_id = $1 ORDER BY requested_at, id",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(deliveries)
    }

    /// Actualiza la entrega. Si está adjunta a una ruta, el agregado de la
    /// ruta se recalcula y se revalida contra el vehículo en la misma
    /// transacción: cambiar `required_capacity` no puede desbordar la ruta.
    pub async fn update(
        &self,
        id: Uuid,
        origin_address: Option<String>,
        destination_address: Option<String>,
        required_capacity: Option<i32>,
        freight_value: Option<Decimal>,
        expected_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Delivery, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            UPDATE deliveries
            SET origin_address = $2, destination_address = $3, required_capacity = $4,
                freight_value = $5, expected_date = $6, notes = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(origin_address.unwrap_or(current.origin_address))
        .bind(destination_address.unwrap_or(current.destination_address))
        .bind(required_capacity.unwrap_or(current.required_capacity))
        .bind(freight_value.unwrap_or(current.freight_value))
        .bind(expected_date.unwrap_or(current.expected_date))
        .bind(notes.unwrap_or(current.notes))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(route_id) = current.route_id {
            let utilized = CapacityEngine::refresh(&mut *tx, route_id).await?;

            let max_capacity = sqlx::query_scalar::<_, i32>(
                r#"
                SELECT v.max_capacity FROM routes r
                JOIN vehicles v ON v.id = r.vehicle_id
                WHERE r.id = $1
                "#,
            )
            .bind(route_id)
            .fetch_optional(&mut *tx)
            .await?;

            if over_capacity(utilized, max_capacity) {
                return Err(AppError::CapacityExceeded {
                    required: utilized,
                    available: max_capacity.unwrap_or(0),
                });
            }
        }

        tx.commit().await?;

        Ok(delivery)
    }

    /// Borra la entrega; si estaba en una ruta, el agregado de la ruta se
    /// recalcula en la misma transacción
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let route_id = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT route_id FROM deliveries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Entrega no encontrada".to_string()))?;

        sqlx::query("DELETE FROM deliveries WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if let Some(route_id) = route_id {
            CapacityEngine::refresh(&mut *tx, route_id).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
