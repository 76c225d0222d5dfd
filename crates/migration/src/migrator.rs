//! # Database Migrator
//!
//! Implements the Sea-ORM migrator trait for the directory schema.

use sea_orm_migration::prelude::*;

use crate::{
    m20261019_000001_create_employees_table,
    m20261019_000002_create_departments_table,
    m20261019_000003_add_employees_department_fk,
    m20261019_000004_create_skills_tables,
    m20261019_000005_create_products_table,
    m20261019_000006_create_teams_table,
    m20261019_000007_create_team_members_table,
    m20261019_000008_create_components_tables,
    m20261019_000009_create_attachment_tables,
    m20261019_000010_create_notification_outbox_table,
};

/// The main migrator that coordinates all migration operations
///
/// Migrations are executed in the order they appear in the list. Employees come first
/// because almost every other table references them.
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_employees_table::Migration),
            Box::new(m20261019_000002_create_departments_table::Migration),
            Box::new(m20261019_000003_add_employees_department_fk::Migration),
            Box::new(m20261019_000004_create_skills_tables::Migration),
            Box::new(m20261019_000005_create_products_table::Migration),
            Box::new(m20261019_000006_create_teams_table::Migration),
            Box::new(m20261019_000007_create_team_members_table::Migration),
            Box::new(m20261019_000008_create_components_tables::Migration),
            Box::new(m20261019_000009_create_attachment_tables::Migration),
            Box::new(m20261019_000010_create_notification_outbox_table::Migration),
        ]
    }
}
