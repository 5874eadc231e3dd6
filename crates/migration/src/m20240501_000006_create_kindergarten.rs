//! Create `kindergarten` table.
//!
//! Each kindergarten owns exactly one account row; the link lives here.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kindergarten::Table)
                    .if_not_exists()
                    .col(pk_auto(Kindergarten::Id))
                    .col(string_len(Kindergarten::Name, 128).unique_key().not_null())
                    .col(string_len(Kindergarten::Address, 255).not_null())
                    .col(string_len_null(Kindergarten::PhoneNumber, 32))
                    .col(string_len(Kindergarten::Email, 255).unique_key().not_null())
                    .col(string_len_null(Kindergarten::Logo, 512))
                    .col(integer(Kindergarten::AccountId).unique_key().not_null())
                    .col(timestamp_with_time_zone(Kindergarten::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Kindergarten::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kindergarten_account")
                            .from(Kindergarten::Table, Kindergarten::AccountId)
                            .to(KindergartenAccount::Table, KindergartenAccount::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Kindergarten::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Kindergarten {
    Table,
    Id,
    Name,
    Address,
    PhoneNumber,
    Email,
    Logo,
    AccountId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum KindergartenAccount { Table, Id }
