use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod store;
pub mod transaction;
pub mod types;

pub use store::{CompanyRulesSnapshot, CompanySnapshot, PayrollStore, PgPayrollStore};

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    log::info!("Connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}
