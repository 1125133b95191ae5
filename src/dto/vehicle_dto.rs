use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{Vehicle, VehicleStatus, VehicleType};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(regex = "crate::utils::validation::PLATE_RE")]
    pub plate: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(length(min = 1, max = 50))]
    pub brand: String,

    pub vehicle_type: String,

    #[validate(range(min = 1))]
    pub max_capacity: i32,

    #[validate(range(min = 1900, max = 2100))]
    pub manufacture_year: i32,

    pub odometer: Option<Decimal>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub brand: Option<String>,

    pub vehicle_type: Option<String>,

    #[validate(range(min = 1))]
    pub max_capacity: Option<i32>,

    pub odometer: Option<Decimal>,
    pub status: Option<String>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub model: String,
    pub brand: String,
    pub vehicle_type: String,
    pub vehicle_type_display: String,
    pub max_capacity: i32,
    pub manufacture_year: i32,
    pub odometer: Decimal,
    pub status: String,
    pub status_display: String,
    pub current_driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        let vehicle_type_display = VehicleType::from_str(&vehicle.vehicle_type)
            .map(|t| t.label().to_string())
            .unwrap_or_else(|| vehicle.vehicle_type.clone());
        let status_display = VehicleStatus::from_str(&vehicle.status)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| vehicle.status.clone());
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            model: vehicle.model,
            brand: vehicle.brand,
            vehicle_type: vehicle.vehicle_type,
            vehicle_type_display,
            max_capacity: vehicle.max_capacity,
            manufacture_year: vehicle.manufacture_year,
            odometer: vehicle.odometer,
            status: vehicle.status,
            status_display,
            current_driver_id: vehicle.current_driver_id,
            created_at: vehicle.created_at,
        }
    }
}

// Estadísticas de rutas de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleStats {
    pub total_routes: i64,
    pub completed_routes: i64,
    pub total_distance: f64,
    pub mean_distance_per_route: f64,
}

// Response del historial de rutas de un vehículo
#[derive(Debug, Serialize)]
pub struct VehicleHistoryResponse {
    pub vehicle: VehicleResponse,
    pub stats: VehicleStats,
    pub recent_routes: Vec<crate::dto::route_dto::RouteResponse>,
}
