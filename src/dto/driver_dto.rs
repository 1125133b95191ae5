use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::driver::{Driver, DriverStatus};

// Request para crear un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(regex = "crate::utils::validation::TAX_ID_RE")]
    pub cpf: String,

    #[validate(custom = "crate::utils::validation::validate_license_category")]
    pub license_category: String,

    #[validate(length(min = 5, max = 20))]
    pub license_number: String,

    #[validate(length(min = 8, max = 20))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    pub birth_date: Option<NaiveDate>,
}

// Request para actualizar un conductor
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_license_category")]
    pub license_category: Option<String>,

    #[validate(length(min = 8, max = 20))]
    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub status: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

// Request para asignar un vehículo al conductor
#[derive(Debug, Deserialize)]
pub struct AssignVehicleRequest {
    pub vehicle_id: Uuid,
}

// Request para aprovisionar la cuenta de sistema de un conductor.
// Paso explícito invocado por el operador después de crear el conductor;
// una colisión de username se reporta como Conflict, nunca se fusiona.
#[derive(Debug, Deserialize, Validate)]
pub struct ProvisionAccountRequest {
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ProvisionAccountResponse {
    pub user_id: Uuid,
    pub username: String,
}

// Response de conductor
#[derive(Debug, Serialize)]
pub struct DriverResponse {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
    pub license_category: String,
    pub license_number: String,
    pub phone: String,
    pub email: String,
    pub status: String,
    pub status_display: String,
    pub birth_date: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        let status_display = DriverStatus::from_str(&driver.status)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| driver.status.clone());
        Self {
            id: driver.id,
            name: driver.name,
            cpf: driver.cpf,
            license_category: driver.license_category,
            license_number: driver.license_number,
            phone: driver.phone,
            email: driver.email,
            status: driver.status,
            status_display,
            birth_date: driver.birth_date,
            user_id: driver.user_id,
            created_at: driver.created_at,
        }
    }
}

// Resumen de conductor embebido en el login
#[derive(Debug, Serialize)]
pub struct DriverSummary {
    pub id: Uuid,
    pub name: String,
    pub status: String,
}
