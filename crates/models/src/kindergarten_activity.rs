//! Join rows between `kindergarten` and `activity`; one row per associated pair.
use sea_orm::entity::prelude::*;

use crate::{kindergarten, activity};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kindergarten_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kindergarten_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kindergarten,
    Activity,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Kindergarten => Entity::belongs_to(kindergarten::Entity)
                .from(Column::KindergartenId)
                .to(kindergarten::Column::Id)
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
