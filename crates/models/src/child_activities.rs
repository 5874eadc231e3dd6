//! Join rows between `child` and `activity`; one row per associated pair.
use sea_orm::entity::prelude::*;

use crate::{child, activity};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "child_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub child_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Child,
    Activity,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Child => Entity::belongs_to(child::Entity)
                .from(Column::ChildId)
                .to(child::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Activity => Entity::belongs_to(activity::Entity)
                .from(Column::ActivityId)
                .to(activity::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
