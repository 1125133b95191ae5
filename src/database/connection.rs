//! Conexión a PostgreSQL y migraciones

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Crea el pool de conexiones
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("✅ Conexión a PostgreSQL establecida");

    Ok(pool)
}

/// Ejecuta las migraciones embebidas
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    info!("✅ Migraciones aplicadas");

    Ok(())
}
