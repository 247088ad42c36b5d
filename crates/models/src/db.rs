use migration::MigratorTrait;
use once_cell::sync::Lazy;
use sea_orm::{Database, DatabaseConnection};
use std::env;
use tracing::info;

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://detail_log.db?mode=rwc".to_string())
});

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    connect_url(DATABASE_URL.as_str()).await
}

pub async fn connect_url(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(url).await?;
    Ok(db)
}

/// Connect and bring the schema up to date (table and indexes are created
/// when missing, so a fresh embedded file is usable immediately).
pub async fn connect_and_migrate(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(url).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database schema up to date");
    Ok(db)
}
