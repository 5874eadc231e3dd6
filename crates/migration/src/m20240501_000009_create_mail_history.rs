//! Create `mail_history` table.
//!
//! Append-only log of payment-slip mails that were handed to SMTP.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MailHistory::Table)
                    .if_not_exists()
                    .col(pk_auto(MailHistory::Id))
                    .col(string_len(MailHistory::Addresses, 1024).not_null())
                    .col(text_null(MailHistory::Message))
                    .col(timestamp_with_time_zone(MailHistory::CreatedDate).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MailHistory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MailHistory { Table, Id, Addresses, Message, CreatedDate }
