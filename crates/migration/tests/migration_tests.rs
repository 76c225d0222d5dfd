//! Applies the full migration set against an in-memory SQLite database.

use migration::{Migrator, MigratorTrait, connect_to_database};
use sea_orm_migration::SchemaManager;

const TABLES: [&str; 12] = [
    "employees",
    "departments",
    "skills",
    "employee_skills",
    "products",
    "teams",
    "team_members",
    "components",
    "product_components",
    "additional_fields",
    "metrics",
    "notification_outbox",
];

#[tokio::test]
async fn test_up_creates_every_table() {
    let db = connect_to_database("sqlite::memory:", 1).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    for table in TABLES {
        assert!(manager.has_table(table).await.unwrap(), "missing table {table}");
    }
}

#[tokio::test]
async fn test_down_removes_every_table() {
    let db = connect_to_database("sqlite::memory:", 1).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Migrator::down(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    for table in TABLES {
        assert!(!manager.has_table(table).await.unwrap(), "table {table} survived rollback");
    }
}

#[tokio::test]
async fn test_up_is_idempotent() {
    let db = connect_to_database("sqlite::memory:", 1).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let pending = Migrator::get_pending_migrations(&db).await.unwrap();
    assert!(pending.is_empty());
}
