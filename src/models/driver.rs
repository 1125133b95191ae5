//! Modelo de Conductor y sus estados

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Conductor - mapea exactamente a la tabla drivers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub license_category: String,
    pub license_number: String,
    pub phone: String,
    pub email: String,
    pub status: String,
    pub birth_date: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Estados posibles de un conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverStatus {
    Active,
    Inactive,
    EnRoute,
    Available,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Active => "active",
            DriverStatus::Inactive => "inactive",
            DriverStatus::EnRoute => "en_route",
            DriverStatus::Available => "available",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "active" => Some(DriverStatus::Active),
            "inactive" => Some(DriverStatus::Inactive),
            "en_route" => Some(DriverStatus::EnRoute),
            "available" => Some(DriverStatus::Available),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DriverStatus::Active => "Activo",
            DriverStatus::Inactive => "Inactivo",
            DriverStatus::EnRoute => "En Ruta",
            DriverStatus::Available => "Disponible",
        }
    }

    /// Un conductor solo puede recibir entregas si está activo o disponible
    pub fn can_take_deliveries(&self) -> bool {
        matches!(self, DriverStatus::Active | DriverStatus::Available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_round_trip() {
        for status in [
            DriverStatus::Active,
            DriverStatus::Inactive,
            DriverStatus::EnRoute,
            DriverStatus::Available,
        ] {
            assert_eq!(DriverStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DriverStatus::from_str("unknown"), None);
    }

    #[test]
    fn only_active_and_available_take_deliveries() {
        assert!(DriverStatus::Active.can_take_deliveries());
        assert!(DriverStatus::Available.can_take_deliveries());
        assert!(!DriverStatus::EnRoute.can_take_deliveries());
        assert!(!DriverStatus::Inactive.can_take_deliveries());
    }
}
