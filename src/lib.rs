use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

pub mod api;
mod axumext;
pub mod config;
pub mod models;
mod monitoring;
pub mod pagination;
mod slug;

pub async fn migrate(db: &DatabaseConnection) -> Result<(), anyhow::Error> {
    Migrator::up(db, None)
        .await
        .context("Database migration failed")
}
