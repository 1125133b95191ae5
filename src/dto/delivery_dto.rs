use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::delivery::{Delivery, DeliveryStatus};
use crate::models::history::DeliveryHistoryEntry;

// Request para crear una entrega
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryRequest {
    pub client_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub origin_address: String,

    #[validate(length(min = 1, max = 200))]
    pub destination_address: String,

    #[validate(regex = "crate::utils::validation::POSTAL_CODE_RE")]
    pub origin_postal_code: Option<String>,

    #[validate(regex = "crate::utils::validation::POSTAL_CODE_RE")]
    pub destination_postal_code: String,

    #[validate(range(min = 1))]
    pub required_capacity: i32,

    pub freight_value: Decimal,
    pub expected_date: NaiveDate,
    pub notes: Option<String>,
}

// Request para actualizar una entrega
// tracking_code y requested_at son de solo lectura
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDeliveryRequest {
    #[validate(length(min = 1, max = 200))]
    pub origin_address: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub destination_address: Option<String>,

    #[validate(range(min = 1))]
    pub required_capacity: Option<i32>,

    pub freight_value: Option<Decimal>,
    pub expected_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

// Request para asignar un conductor a la entrega
#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
}

// Request para actualizar el estado de una entrega
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub note: Option<String>,
}

// Query del rastreo público
#[derive(Debug, Deserialize)]
pub struct TrackingQuery {
    pub code: Option<String>,
}

// Response de entrega
#[derive(Debug, Serialize)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub tracking_code: String,
    pub client_id: Uuid,
    pub origin_address: String,
    pub destination_address: String,
    pub origin_postal_code: String,
    pub destination_postal_code: String,
    pub status: String,
    pub status_display: String,
    pub required_capacity: i32,
    pub freight_value: Decimal,
    pub requested_at: DateTime<Utc>,
    pub expected_date: NaiveDate,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub driver_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
}

impl From<Delivery> for DeliveryResponse {
    fn from(delivery: Delivery) -> Self {
        let status_display = DeliveryStatus::from_str(&delivery.status)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| delivery.status.clone());
        Self {
            id: delivery.id,
            tracking_code: delivery.tracking_code,
            client_id: delivery.client_id,
            origin_address: delivery.origin_address,
            destination_address: delivery.destination_address,
            origin_postal_code: delivery.origin_postal_code,
            destination_postal_code: delivery.destination_postal_code,
            status: delivery.status,
            status_display,
            required_capacity: delivery.required_capacity,
            freight_value: delivery.freight_value,
            requested_at: delivery.requested_at,
            expected_date: delivery.expected_date,
            delivered_at: delivery.delivered_at,
            notes: delivery.notes,
            driver_id: delivery.driver_id,
            route_id: delivery.route_id,
        }
    }
}

// Entrada del historial
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub previous_status: String,
    pub new_status: String,
    pub note: String,
    pub driver_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

impl From<DeliveryHistoryEntry> for HistoryEntryResponse {
    fn from(entry: DeliveryHistoryEntry) -> Self {
        Self {
            id: entry.id,
            delivery_id: entry.delivery_id,
            previous_status: entry.previous_status,
            new_status: entry.new_status,
            note: entry.note,
            driver_id: entry.driver_id,
            recorded_at: entry.recorded_at,
        }
    }
}

// Response del rastreo público: entrega + historial completo
#[derive(Debug, Serialize)]
pub struct PublicTrackingResponse {
    pub delivery: DeliveryResponse,
    pub history: Vec<HistoryEntryResponse>,
}

// Response del rastreo autenticado, con el contexto de la ruta
#[derive(Debug, Serialize)]
pub struct TrackingDetailResponse {
    pub delivery: DeliveryResponse,
    pub route: Option<crate::dto::route_dto::RouteResponse>,
    pub vehicle: Option<crate::dto::vehicle_dto::VehicleResponse>,
    pub driver: Option<crate::dto::driver_dto::DriverResponse>,
    pub history: Vec<HistoryEntryResponse>,
    pub next_delivery: Option<DeliveryResponse>,
}
