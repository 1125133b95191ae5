use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Query del endpoint de reportes
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
}

// Query del dashboard; un admin debe indicar el conductor
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub driver_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DeliveryReport {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub success_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct DriverReport {
    pub active: i64,
    pub en_route: i64,
    pub available: i64,
}

#[derive(Debug, Serialize)]
pub struct VehicleReport {
    pub available: i64,
    pub in_use: i64,
    pub maintenance: i64,
}

#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub active: i64,
    pub completed: i64,
}

#[derive(Debug, Serialize)]
pub struct CapacityReport {
    pub utilized: i64,
    pub total: i64,
    pub available: i64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct ReportAlerts {
    pub pending_without_driver: i64,
    pub pending_without_route: i64,
    pub vehicles_in_maintenance: i64,
}

#[derive(Debug, Serialize)]
pub struct ReportStats {
    pub deliveries: DeliveryReport,
    pub drivers: DriverReport,
    pub vehicles: VehicleReport,
    pub routes: RouteReport,
    pub capacity: CapacityReport,
}

// Response del reporte general del sistema
#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub period: ReportPeriod,
    pub stats: ReportStats,
    pub alerts: ReportAlerts,
}

// Dashboard del conductor autenticado
#[derive(Debug, Serialize)]
pub struct DriverDashboardResponse {
    pub driver: crate::dto::driver_dto::DriverResponse,
    pub current_vehicle: Option<crate::dto::vehicle_dto::VehicleResponse>,
    pub active_routes: Vec<crate::dto::route_dto::RouteResponse>,
    pub deliveries_today: Vec<crate::dto::delivery_dto::DeliveryResponse>,
    pub total_deliveries: i64,
    pub pending_deliveries: i64,
    pub completed_deliveries: i64,
    pub utilized_capacity: i64,
}
