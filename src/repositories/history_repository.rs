use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::history::DeliveryHistoryEntry;
use crate::utils::errors::AppError;

/// Datos de una nueva entrada de historial
#[derive(Debug)]
pub struct NewHistoryEntry {
    pub delivery_id: Uuid,
    pub previous_status: String,
    pub new_status: String,
    pub note: String,
    pub driver_id: Option<Uuid>,
}

pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta una entrada dentro de una transacción en curso.
    ///
    /// El historial es append-only: este repositorio no expone update ni
    /// delete, y la entrada debe confirmarse junto con el cambio de estado
    /// que la origina.
    pub async fn insert(
        conn: &mut PgConnection,
        entry: NewHistoryEntry,
    ) -> Result<DeliveryHistoryEntry, AppError> {
        let row = sqlx::query_as::<_, DeliveryHistoryEntry>(
            r#"
            INSERT INTO delivery_history (id, delivery_id, previous_status, new_status, note,
                                          driver_id, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.delivery_id)
        .bind(entry.previous_status)
        .bind(entry.new_status)
        .bind(entry.note)
        .bind(entry.driver_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    pub async fn list_by_delivery(
        &self,
        delivery_id: Uuid,
    ) -> Result<Vec<DeliveryHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, DeliveryHistoryEntry>(
            r#"
            SELECT * FROM delivery_history
            WHERE delivery_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(delivery_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn list_by_driver(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<DeliveryHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, DeliveryHistoryEntry>(
            r#"
            SELECT * FROM delivery_history
            WHERE driver_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
