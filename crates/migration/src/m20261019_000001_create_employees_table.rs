use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // department_id gets its foreign key once departments exist
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(pk_auto(Employees::Id))
                    .col(string_len(Employees::FullName, 250))
                    .col(string_len_uniq(Employees::Email, 254))
                    .col(string_null(Employees::PasswordHash))
                    .col(string_len(Employees::Position, 250))
                    .col(date(Employees::BirthDate))
                    .col(date_null(Employees::HireDate))
                    .col(string_null(Employees::Avatar))
                    .col(string_len_null(Employees::Telegram, 50).unique_key())
                    .col(string_len_uniq(Employees::Telephone, 20))
                    .col(string_len(Employees::EmploymentType, 20))
                    .col(string_len(Employees::Status, 20).default("working"))
                    .col(string_len(Employees::Location, 300))
                    .col(string_len_null(Employees::Grade, 2))
                    .col(text(Employees::Bio).default(""))
                    .col(boolean(Employees::IsOutsource).default(false))
                    .col(boolean(Employees::IsSuperuser).default(false))
                    .col(integer_null(Employees::DepartmentId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_department_id")
                    .table(Employees::Table)
                    .col(Employees::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employees_status")
                    .table(Employees::Table)
                    .col(Employees::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    Position,
    BirthDate,
    HireDate,
    Avatar,
    Telegram,
    Telephone,
    EmploymentType,
    Status,
    Location,
    Grade,
    Bio,
    IsOutsource,
    IsSuperuser,
    DepartmentId,
}
