//! Create `groups` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(pk_auto(Groups::Id))
                    .col(string_len(Groups::Name, 128).unique_key().not_null())
                    .col(decimal_len(Groups::Price, 12, 2).not_null())
                    .col(decimal_len(Groups::Discount, 12, 2).not_null().default(0))
                    .col(boolean(Groups::Active).not_null().default(true))
                    .col(timestamp_with_time_zone(Groups::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Groups::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Groups::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Groups { Table, Id, Name, Price, Discount, Active, CreatedAt, UpdatedAt }
