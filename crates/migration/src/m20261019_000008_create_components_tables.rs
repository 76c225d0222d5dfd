use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Components::Table)
                    .if_not_exists()
                    .col(pk_auto(Components::Id))
                    .col(string_len_uniq(Components::Name, 250))
                    .col(string_len(Components::ComponentType, 150))
                    .col(string_len_null(Components::Link, 200))
                    .col(integer_null(Components::OwnerId))
                    .col(integer_null(Components::SecondOwnerId))
                    .col(text(Components::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_components_owner_id")
                            .from(Components::Table, Components::OwnerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_components_second_owner_id")
                            .from(Components::Table, Components::SecondOwnerId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_components_component_type")
                    .table(Components::Table)
                    .col(Components::ComponentType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductComponents::Table)
                    .if_not_exists()
                    .col(pk_auto(ProductComponents::Id))
                    .col(integer(ProductComponents::ProductId))
                    .col(integer(ProductComponents::ComponentId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_components_product_id")
                            .from(ProductComponents::Table, ProductComponents::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_components_component_id")
                            .from(ProductComponents::Table, ProductComponents::ComponentId)
                            .to(Components::Table, Components::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_components_pair_unique")
                    .table(ProductComponents::Table)
                    .col(ProductComponents::ProductId)
                    .col(ProductComponents::ComponentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductComponents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Components::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Components {
    Table,
    Id,
    Name,
    ComponentType,
    Link,
    OwnerId,
    SecondOwnerId,
    Description,
}

#[derive(DeriveIden)]
pub enum ProductComponents {
    Table,
    Id,
    ProductId,
    ComponentId,
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
pub enum Employees {
    Table,
    Id,
}
