use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationOutbox::Table)
                    .if_not_exists()
                    .col(pk_auto(NotificationOutbox::Id))
                    .col(string_len(NotificationOutbox::Subject, 255))
                    .col(text(NotificationOutbox::Body))
                    .col(json(NotificationOutbox::Recipients))
                    .col(string_len(NotificationOutbox::Status, 20).default("pending"))
                    .col(integer(NotificationOutbox::Attempts).default(0))
                    .col(text_null(NotificationOutbox::LastError))
                    .col(
                        timestamp_with_time_zone(NotificationOutbox::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(NotificationOutbox::SentAt))
                    .to_owned(),
            )
            .await?;

        // The dispatcher polls pending rows in id order
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notification_outbox_status")
                    .table(NotificationOutbox::Table)
                    .col(NotificationOutbox::Status)
                    .col(NotificationOutbox::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationOutbox::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum NotificationOutbox {
    Table,
    Id,
    Subject,
    Body,
    Recipients,
    Status,
    Attempts,
    LastError,
    CreatedAt,
    SentAt,
}
