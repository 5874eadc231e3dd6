use sea_orm_migration::prelude::*;

const CHILD_TRIPLE_INDEX: &str = "uniq_child_name_surname_parent";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Child: lookups by owner references
        manager
            .create_index(
                Index::create()
                    .name("idx_child_parent")
                    .table(Child::Table)
                    .col(Child::ParentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_child_kindergarten")
                    .table(Child::Table)
                    .col(Child::KindergartenId)
                    .to_owned(),
            )
            .await?;

        // Bill: index on child_id
        manager
            .create_index(
                Index::create()
                    .name("idx_bill_child")
                    .table(Bill::Table)
                    .col(Bill::ChildId)
                    .to_owned(),
            )
            .await?;

        // MailHistory: finder by addresses
        manager
            .create_index(
                Index::create()
                    .name("idx_mail_history_addresses")
                    .table(MailHistory::Table)
                    .col(MailHistory::Addresses)
                    .to_owned(),
            )
            .await?;

        // Child: case-insensitive unique (name, surname, parent_id) over the key columns
        manager
            .create_index(
                Index::create()
                    .name(CHILD_TRIPLE_INDEX)
                    .table(Child::Table)
                    .col(Child::NameKey)
                    .col(Child::SurnameKey)
                    .col(Child::ParentId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(CHILD_TRIPLE_INDEX).table(Child::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_mail_history_addresses").table(MailHistory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bill_child").table(Bill::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_child_kindergarten").table(Child::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_child_parent").table(Child::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Child { Table, NameKey, SurnameKey, ParentId, KindergartenId }

#[derive(DeriveIden)]
enum Bill { Table, ChildId }

#[derive(DeriveIden)]
enum MailHistory { Table, Addresses }
