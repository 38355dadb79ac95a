use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(pk_auto(Client::Id))
                    .col(string(Client::FirstName))
                    .col(string(Client::LastName))
                    .col(string(Client::Email))
                    .col(
                        ColumnDef::new(Client::ReminderFrequency)
                            .string()
                            .not_null()
                            .check(Expr::col(Client::ReminderFrequency).is_in(["YEAR", "HALFYEAR"]))
                            .comment("Reminder cadence token: 'YEAR' or 'HALFYEAR'"),
                    )
                    .col(
                        timestamp_with_time_zone(Client::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Client::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Client {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    ReminderFrequency,
    CreatedAt,
}
