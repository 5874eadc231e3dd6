//! Create `child` table.
//!
//! `name_key`/`surname_key` hold the lowercased name and surname; the
//! (name_key, surname_key, parent) unique index is added by the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Child::Table)
                    .if_not_exists()
                    .col(pk_auto(Child::Id))
                    .col(string_len(Child::Name, 128).not_null())
                    .col(string_len(Child::Surname, 128).not_null())
                    .col(string_len(Child::NameKey, 128).not_null())
                    .col(string_len(Child::SurnameKey, 128).not_null())
                    .col(integer(Child::SiblingOrder).not_null().default(1))
                    .col(date_null(Child::Birthday))
                    .col(boolean(Child::Status).not_null().default(true))
                    .col(integer(Child::GroupId).not_null())
                    .col(integer(Child::ParentId).not_null())
                    .col(integer(Child::KindergartenId).not_null())
                    .col(timestamp_with_time_zone(Child::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Child::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_child_group")
                            .from(Child::Table, Child::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_child_parent")
                            .from(Child::Table, Child::ParentId)
                            .to(Parent::Table, Parent::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_child_kindergarten")
                            .from(Child::Table, Child::KindergartenId)
                            .to(Kindergarten::Table, Kindergarten::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Child::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Child {
    Table,
    Id,
    Name,
    Surname,
    NameKey,
    SurnameKey,
    SiblingOrder,
    Birthday,
    Status,
    GroupId,
    ParentId,
    KindergartenId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Groups { Table, Id }

#[derive(DeriveIden)]
enum Parent { Table, Id }

#[derive(DeriveIden)]
enum Kindergarten { Table, Id }
