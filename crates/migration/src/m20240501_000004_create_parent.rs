//! Create `parent` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parent::Table)
                    .if_not_exists()
                    .col(pk_auto(Parent::Id))
                    .col(string_len(Parent::Name, 128).not_null())
                    .col(string_len(Parent::Surname, 128).not_null())
                    .col(string_len(Parent::Email, 255).unique_key().not_null())
                    .col(string_len(Parent::Address, 255).not_null())
                    .col(timestamp_with_time_zone(Parent::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Parent::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Parent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Parent { Table, Id, Name, Surname, Email, Address, CreatedAt, UpdatedAt }
