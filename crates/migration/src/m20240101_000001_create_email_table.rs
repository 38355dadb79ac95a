use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240101_000000_create_client_table::Client;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One row per reminder email sent to a client.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Email::Table)
                    .if_not_exists()
                    .col(pk_auto(Email::Id))
                    .col(integer(Email::ClientId))
                    .col(
                        timestamp_with_time_zone(Email::SentAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_email_client_id")
                            .from(Email::Table, Email::ClientId)
                            .to(Client::Table, Client::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_email_client_id")
                    .table(Email::Table)
                    .col(Email::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_email_sent_at")
                    .table(Email::Table)
                    .col(Email::SentAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Email::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Email {
    Table,
    Id,
    ClientId,
    SentAt,
}
