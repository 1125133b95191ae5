//! Modelo de Entrega y su ciclo de vida de estados

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entrega - mapea exactamente a la tabla deliveries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Delivery {
    pub id: Uuid,
    pub tracking_code: String,
    pub client_id: Uuid,
    pub origin_address: String,
    pub destination_address: String,
    pub origin_postal_code: String,
    pub destination_postal_code: String,
    pub status: String,
    pub required_capacity: i32,
    pub freight_value: Decimal,
    pub requested_at: DateTime<Utc>,
    pub expected_date: NaiveDate,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub driver_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
}

/// Estados posibles de una entrega
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    InTransit,
    Delivered,
    Cancelled,
    Rescheduled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::InTransit => "in_transit",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Cancelled => "cancelled",
            DeliveryStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DeliveryStatus::Pending),
            "in_transit" => Some(DeliveryStatus::InTransit),
            "delivered" => Some(DeliveryStatus::Delivered),
            "cancelled" => Some(DeliveryStatus::Cancelled),
            "rescheduled" => Some(DeliveryStatus::Rescheduled),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "Pendiente",
            DeliveryStatus::InTransit => "En Tránsito",
            DeliveryStatus::Delivered => "Entregada",
            DeliveryStatus::Cancelled => "Cancelada",
            DeliveryStatus::Rescheduled => "Reprogramada",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tokens_round_trip() {
        for status in [
            DeliveryStatus::Pending,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
            DeliveryStatus::Cancelled,
            DeliveryStatus::Rescheduled,
        ] {
            assert_eq!(DeliveryStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DeliveryStatus::from_str("lost"), None);
    }
}
