use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_NAME: &str = "fk_employees_department_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // employees and departments reference each other, so one side has to be added
        // after both tables exist. SQLite cannot ALTER a constraint in; there the
        // department service clears employees.department_id itself.
        if manager.get_database_backend() == DatabaseBackend::Sqlite {
            tracing::info!(target: "migrate", fk = FK_NAME, "Skipping foreign key on SQLite");
            return Ok(());
        }

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_NAME)
                    .from(Employees::Table, Employees::DepartmentId)
                    .to(Departments::Table, Departments::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DatabaseBackend::Sqlite {
            return Ok(());
        }

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_NAME)
                    .table(Employees::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    DepartmentId,
}

#[derive(DeriveIden)]
pub enum Departments {
    Table,
    Id,
}
