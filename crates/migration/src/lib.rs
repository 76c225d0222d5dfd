//! # Directory Migrations
//!
//! Schema for the company directory. Every table uses plain column types so the
//! same migrations run on PostgreSQL and on SQLite (tests, local tooling).

pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::DatabaseConnection;
use sea_orm_migration::sea_orm::{ConnectOptions, Database};

mod m20261019_000001_create_employees_table;
mod m20261019_000002_create_departments_table;
mod m20261019_000003_add_employees_department_fk;
mod m20261019_000004_create_skills_tables;
mod m20261019_000005_create_products_table;
mod m20261019_000006_create_teams_table;
mod m20261019_000007_create_team_members_table;
mod m20261019_000008_create_components_tables;
mod m20261019_000009_create_attachment_tables;
mod m20261019_000010_create_notification_outbox_table;
pub mod migrator;

pub use migrator::Migrator;

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
