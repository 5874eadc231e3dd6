//! Create the three many-to-many join tables.
//!
//! Rows cascade away with either side; the composite primary key keeps each
//! pair unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChildActivities::Table)
                    .if_not_exists()
                    .col(integer(ChildActivities::ChildId).not_null())
                    .col(integer(ChildActivities::ActivityId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_child_activities")
                            .col(ChildActivities::ChildId)
                            .col(ChildActivities::ActivityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_child_activities_child")
                            .from(ChildActivities::Table, ChildActivities::ChildId)
                            .to(Child::Table, Child::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_child_activities_activity")
                            .from(ChildActivities::Table, ChildActivities::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KindergartenGroups::Table)
                    .if_not_exists()
                    .col(integer(KindergartenGroups::KindergartenId).not_null())
                    .col(integer(KindergartenGroups::GroupId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_kindergarten_groups")
                            .col(KindergartenGroups::KindergartenId)
                            .col(KindergartenGroups::GroupId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kindergarten_groups_kindergarten")
                            .from(KindergartenGroups::Table, KindergartenGroups::KindergartenId)
                            .to(Kindergarten::Table, Kindergarten::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kindergarten_groups_group")
                            .from(KindergartenGroups::Table, KindergartenGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KindergartenActivity::Table)
                    .if_not_exists()
                    .col(integer(KindergartenActivity::KindergartenId).not_null())
                    .col(integer(KindergartenActivity::ActivityId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_kindergarten_activity")
                            .col(KindergartenActivity::KindergartenId)
                            .col(KindergartenActivity::ActivityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kindergarten_activity_kindergarten")
                            .from(KindergartenActivity::Table, KindergartenActivity::KindergartenId)
                            .to(Kindergarten::Table, Kindergarten::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kindergarten_activity_activity")
                            .from(KindergartenActivity::Table, KindergartenActivity::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(KindergartenActivity::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(KindergartenGroups::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ChildActivities::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ChildActivities { Table, ChildId, ActivityId }

#[derive(DeriveIden)]
enum KindergartenGroups { Table, KindergartenId, GroupId }

#[derive(DeriveIden)]
enum KindergartenActivity { Table, KindergartenId, ActivityId }

#[derive(DeriveIden)]
enum Child { Table, Id }

#[derive(DeriveIden)]
enum Kindergarten { Table, Id }

#[derive(DeriveIden)]
enum Activity { Table, Id }

#[derive(DeriveIden)]
enum Groups { Table, Id }
