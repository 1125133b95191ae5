//! Modelo del historial de entregas
//!
//! Las filas de historial son append-only: una vez creadas nunca se
//! actualizan ni se borran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entrada del historial de una entrega
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryHistoryEntry {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub previous_status: String,
    pub new_status: String,
    pub note: String,
    pub driver_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}
