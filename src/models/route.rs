//! Modelo de Ruta y su ciclo de vida de estados

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ruta - mapea exactamente a la tabla routes
///
/// `utilized_capacity` es un agregado derivado: solo el motor de capacidad
/// lo escribe, nunca los callers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub route_date: NaiveDate,
    pub status: String,
    pub utilized_capacity: i32,
    pub distance_estimated: Decimal,
    pub distance_actual: Decimal,
    pub duration_estimated_minutes: i32,
    pub duration_actual_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Estados posibles de una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "planned",
            RouteStatus::InProgress => "in_progress",
            RouteStatus::Completed => "completed",
            RouteStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "planned" => Some(RouteStatus::Planned),
            "in_progress" => Some(RouteStatus::InProgress),
            "completed" => Some(RouteStatus::Completed),
            "cancelled" => Some(RouteStatus::Cancelled),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Planned => "Planificada",
            RouteStatus::InProgress => "En Curso",
            RouteStatus::Completed => "Completada",
            RouteStatus::Cancelled => "Cancelada",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_round_trip() {
        for status in [
            RouteStatus::Planned,
            RouteStatus::InProgress,
            RouteStatus::Completed,
            RouteStatus::Cancelled,
        ] {
            assert_eq!(RouteStatus::from_str(status.as_str()), Some(status));
        }
    }
}
