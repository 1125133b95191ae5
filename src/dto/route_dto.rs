use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route::{Route, RouteStatus};

// Request para crear una ruta, opcionalmente con un set inicial de entregas
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub description: Option<String>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub route_date: NaiveDate,
    pub distance_estimated: Option<Decimal>,
    pub duration_estimated_minutes: Option<i32>,
    pub deliveries: Option<Vec<Uuid>>,
}

// Request para actualizar una ruta
// utilized_capacity es derivado y no se acepta del caller
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRouteRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub route_date: Option<NaiveDate>,
    pub distance_estimated: Option<Decimal>,
    pub duration_estimated_minutes: Option<i32>,
}

// Request para añadir una entrega a la ruta
#[derive(Debug, Deserialize)]
pub struct AddDeliveryRequest {
    pub delivery_id: Uuid,
}

// Request para concluir una ruta
#[derive(Debug, Deserialize)]
pub struct CompleteRouteRequest {
    pub distance_actual: Option<Decimal>,
    pub duration_actual_minutes: Option<i32>,
}

// Response de ruta
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub route_date: NaiveDate,
    pub status: String,
    pub status_display: String,
    pub utilized_capacity: i32,
    pub distance_estimated: Decimal,
    pub distance_actual: Decimal,
    pub duration_estimated_minutes: i32,
    pub duration_actual_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        let status_display = RouteStatus::from_str(&route.status)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| route.status.clone());
        Self {
            id: route.id,
            name: route.name,
            description: route.description,
            driver_id: route.driver_id,
            vehicle_id: route.vehicle_id,
            route_date: route.route_date,
            status: route.status,
            status_display,
            utilized_capacity: route.utilized_capacity,
            distance_estimated: route.distance_estimated,
            distance_actual: route.distance_actual,
            duration_estimated_minutes: route.duration_estimated_minutes,
            duration_actual_minutes: route.duration_actual_minutes,
            created_at: route.created_at,
            started_at: route.started_at,
            completed_at: route.completed_at,
        }
    }
}

// Snapshot de capacidad de una ruta
#[derive(Debug, Serialize)]
pub struct CapacityResponse {
    pub max_capacity: i32,
    pub utilized_capacity: i32,
    pub available_capacity: i32,
    pub utilization_percent: f64,
}

// Conteo de entregas por estado
#[derive(Debug, Serialize)]
pub struct DeliveryStatusCounts {
    pub total: i64,
    pub pending: i64,
    pub in_transit: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

// Dashboard de una ruta
#[derive(Debug, Serialize)]
pub struct RouteDashboardResponse {
    pub route: RouteResponse,
    pub driver: Option<crate::dto::driver_dto::DriverResponse>,
    pub vehicle: Option<crate::dto::vehicle_dto::VehicleResponse>,
    pub deliveries: Vec<crate::dto::delivery_dto::DeliveryResponse>,
    pub stats: DeliveryStatusCounts,
    pub capacity: CapacityResponse,
}
