use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::driver::Driver;
use crate::repositories::AccessScope;
use crate::utils::errors::AppError;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: String,
        cpf: String,
        license_category: String,
        license_number: String,
        phone: String,
        email: String,
        birth_date: Option<NaiveDate>,
    ) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, name, cpf, license_category, license_number, phone, email,
                                 status, birth_date, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'available', $8, NULL, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(cpf)
        .bind(license_category)
        .bind(license_number)
        .bind(phone)
        .bind(email)
        .bind(birth_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    /// Admin ve todos; un conductor solo se ve a sí mismo
    pub async fn list(
        &self,
        scope: AccessScope,
        status: Option<String>,
    ) -> Result<Vec<Driver>, AppError> {
        let drivers = match scope {
            AccessScope::Admin => {
                sqlx::query_as::<_, Driver>(
                    r#"
                    SELECT * FROM drivers
                    WHERE ($1::text IS NULL OR status = $1)
                    ORDER BY name
                    "#,
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            AccessScope::Driver(driver_id) => {
                sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
                    .bind(driver_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            AccessScope::Unlinked => Vec::new(),
        };

        Ok(drivers)
    }

    pub async fn cpf_exists(&self, cpf: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM drivers WHERE cpf = $1)")
            .bind(cpf)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn license_number_exists(&self, license_number: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM drivers WHERE license_number = $1)")
                .bind(license_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        license_category: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        status: Option<String>,
        birth_date: Option<NaiveDate>,
    ) -> Result<Driver, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conductor no encontrado".to_string()))?;

        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET name = $2, license_category = $3, phone = $4, email = $5, status = $6,
                birth_date = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.unwrap_or(current.name))
        .bind(license_category.unwrap_or(current.license_category))
        .bind(phone.unwrap_or(current.phone))
        .bind(email.unwrap_or(current.email))
        .bind(status.unwrap_or(current.status))
        .bind(birth_date.or(current.birth_date))
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    /// Vincula la cuenta de sistema aprovisionada al conductor
    pub async fn link_user(&self, id: Uuid, user_id: Uuid) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            "UPDATE drivers SET user_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Conductor no encontrado".to_string()));
        }

        Ok(())
    }
}
