//! Create `activity` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(pk_auto(Activity::Id))
                    .col(string_len(Activity::Name, 128).unique_key().not_null())
                    .col(decimal_len(Activity::Price, 12, 2).not_null().default(0))
                    .col(boolean(Activity::Status).not_null().default(true))
                    .col(timestamp_with_time_zone(Activity::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Activity::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Activity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Activity { Table, Id, Name, Price, Status, CreatedAt, UpdatedAt }
