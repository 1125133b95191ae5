//! Modelo de Vehículo, su tipo y sus estados

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehículo - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub model: String,
    pub brand: String,
    pub vehicle_type: String,
    pub max_capacity: i32,
    pub manufacture_year: i32,
    pub odometer: Decimal,
    pub status: String,
    pub current_driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Tipos de vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Van,
    Truck,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Van => "van",
            VehicleType::Truck => "truck",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "car" => Some(VehicleType::Car),
            "van" => Some(VehicleType::Van),
            "truck" => Some(VehicleType::Truck),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Car => "Coche",
            VehicleType::Van => "Furgoneta",
            VehicleType::Truck => "Camión",
        }
    }
}

/// Estados posibles de un vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Maintenance => "maintenance",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "available" => Some(VehicleStatus::Available),
            "in_use" => Some(VehicleStatus::InUse),
            "maintenance" => Some(VehicleStatus::Maintenance),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Disponible",
            VehicleStatus::InUse => "En Uso",
            VehicleStatus::Maintenance => "Mantenimiento",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tokens_round_trip() {
        for t in [VehicleType::Car, VehicleType::Van, VehicleType::Truck] {
            assert_eq!(VehicleType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(VehicleType::from_str("bus"), None);
    }

    #[test]
    fn status_tokens_round_trip() {
        for s in [
            VehicleStatus::Available,
            VehicleStatus::InUse,
            VehicleStatus::Maintenance,
        ] {
            assert_eq!(VehicleStatus::from_str(s.as_str()), Some(s));
        }
    }
}
