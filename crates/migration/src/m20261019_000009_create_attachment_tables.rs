use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Both tables share a layout: owner reference by (kind, id), no foreign key.
        for (table, index) in [
            (Attachments::AdditionalFields, "idx_additional_fields_owner"),
            (Attachments::Metrics, "idx_metrics_owner"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(pk_auto(Attachments::Id))
                        .col(string_len(Attachments::OwnerKind, 20))
                        .col(integer(Attachments::OwnerId))
                        .col(string_len(Attachments::Name, 255))
                        .col(text(Attachments::Description))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(index)
                        .table(table)
                        .col(Attachments::OwnerKind)
                        .col(Attachments::OwnerId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachments::Metrics).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attachments::AdditionalFields).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Attachments {
    AdditionalFields,
    Metrics,
    Id,
    OwnerKind,
    OwnerId,
    Name,
    Description,
}
