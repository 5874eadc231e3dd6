//! Create `kindergarten_account` table.
//!
//! Bank details of a kindergarten; referenced from `kindergarten.account_id`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KindergartenAccount::Table)
                    .if_not_exists()
                    .col(pk_auto(KindergartenAccount::Id))
                    .col(string_len(KindergartenAccount::BankName, 128).not_null())
                    .col(string_len(KindergartenAccount::AccountNumber, 64).unique_key().not_null())
                    .col(string_len(KindergartenAccount::Pib, 9).not_null())
                    .col(string_len(KindergartenAccount::IdentificationNumber, 64).unique_key().not_null())
                    .col(integer_null(KindergartenAccount::ActivityCode))
                    .col(timestamp_with_time_zone(KindergartenAccount::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(KindergartenAccount::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(KindergartenAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum KindergartenAccount {
    Table,
    Id,
    BankName,
    AccountNumber,
    Pib,
    IdentificationNumber,
    ActivityCode,
    CreatedAt,
    UpdatedAt,
}
