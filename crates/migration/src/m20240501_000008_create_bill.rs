//! Create `bill` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bill::Table)
                    .if_not_exists()
                    .col(pk_auto(Bill::Id))
                    .col(small_integer(Bill::Year).not_null())
                    .col(string_len(Bill::Month, 32).not_null())
                    .col(date_null(Bill::Deadline))
                    .col(string_len_null(Bill::BillCode, 64))
                    .col(decimal_len(Bill::PaymentSum, 12, 2).not_null().default(0))
                    .col(integer(Bill::KindergartenId).not_null())
                    .col(integer(Bill::ChildId).not_null())
                    .col(timestamp_with_time_zone(Bill::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Bill::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_kindergarten")
                            .from(Bill::Table, Bill::KindergartenId)
                            .to(Kindergarten::Table, Kindergarten::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_child")
                            .from(Bill::Table, Bill::ChildId)
                            .to(Child::Table, Child::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bill::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bill {
    Table,
    Id,
    Year,
    Month,
    Deadline,
    BillCode,
    PaymentSum,
    KindergartenId,
    ChildId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Kindergarten { Table, Id }

#[derive(DeriveIden)]
enum Child { Table, Id }
