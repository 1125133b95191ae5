use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::client::Client;

// Request para crear un cliente
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 20))]
    pub phone: String,

    #[validate(regex = "crate::utils::validation::TAX_ID_RE")]
    pub tax_id: String,

    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub address: String,

    #[validate(regex = "crate::utils::validation::POSTAL_CODE_RE")]
    pub postal_code: String,
}

// Request para actualizar un cliente
// La identidad (tax_id) es inmutable una vez creado; solo datos de contacto
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 20))]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[validate(regex = "crate::utils::validation::POSTAL_CODE_RE")]
    pub postal_code: Option<String>,
}

// Response de cliente
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tax_id: String,
    pub address: String,
    pub postal_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            tax_id: client.tax_id,
            address: client.address,
            postal_code: client.postal_code,
            created_at: client.created_at,
        }
    }
}
