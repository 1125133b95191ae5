use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::client::Client;
use crate::repositories::AccessScope;
use crate::utils::errors::AppError;

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        email: String,
        phone: String,
        tax_id: String,
        address: String,
        postal_code: String,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, name, email, phone, tax_id, address, postal_code, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(tax_id)
        .bind(address)
        .bind(postal_code)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Admin ve todos los clientes; un conductor solo los clientes de sus entregas
    pub async fn list(&self, scope: AccessScope) -> Result<Vec<Client>, AppError> {
        let clients = match scope {
            AccessScope::Admin => {
                sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
            AccessScope::Driver(driver_id) => {
                sqlx::query_as::<_, Client>(
                    r#"
                    SELECT * FROM clients
                    WHERE id IN (SELECT DISTINCT client_id FROM deliveries WHERE driver_id = $1)
                    ORDER BY name
                    "#,
                )
                .bind(driver_id)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Unlinked => Vec::new(),
        };

        Ok(clients)
    }

    /// Un conductor solo ve un cliente si tiene alguna entrega suya
    pub async fn visible_to_driver(
        &self,
        client_id: Uuid,
        driver_id: Uuid,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM deliveries WHERE client_id = $1 AND driver_id = $2)",
        )
        .bind(client_id)
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn tax_id_exists(&self, tax_id: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clients WHERE tax_id = $1)")
                .bind(tax_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM clients WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Solo los campos de contacto son mutables; identidad y tax_id no
    pub async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
        postal_code: Option<String>,
    ) -> Result<Client, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado".to_string()))?;

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET email = $2, phone = $3, address = $4, postal_code = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email.unwrap_or(current.email))
        .bind(phone.unwrap_or(current.phone))
        .bind(address.unwrap_or(current.address))
        .bind(postal_code.unwrap_or(current.postal_code))
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Cliente no encontrado".to_string()));
        }

        Ok(())
    }
}
