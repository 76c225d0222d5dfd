use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk_auto(Departments::Id))
                    .col(string_len_uniq(Departments::Name, 250))
                    .col(text(Departments::Description))
                    .col(integer_null(Departments::OwnerId))
                    .col(integer_null(Departments::ParentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_owner_id")
                            .from(Departments::Table, Departments::OwnerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    // Departments with children cannot be deleted
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_parent_id")
                            .from(Departments::Table, Departments::ParentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_departments_parent_id")
                    .table(Departments::Table)
                    .col(Departments::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Departments {
    Table,
    Id,
    Name,
    Description,
    OwnerId,
    ParentId,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
}
