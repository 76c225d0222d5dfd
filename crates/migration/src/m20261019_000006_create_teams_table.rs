use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string_len_uniq(Teams::Name, 250))
                    .col(integer_null(Teams::ManagerId))
                    .col(integer_null(Teams::ProductId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_manager_id")
                            .from(Teams::Table, Teams::ManagerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_product_id")
                            .from(Teams::Table, Teams::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_product_id")
                    .table(Teams::Table)
                    .col(Teams::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Teams {
    Table,
    Id,
    Name,
    ManagerId,
    ProductId,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
}
