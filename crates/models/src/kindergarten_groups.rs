//! Join rows between `kindergarten` and `group`; one row per associated pair.
use sea_orm::entity::prelude::*;

use crate::{kindergarten, group};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kindergarten_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kindergarten_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kindergarten,
    Group,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Kindergarten => Entity::belongs_to(kindergarten::Entity)
                .from(Column::KindergartenId)
                .to(kindergarten::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Group => Entity::belongs_to(group::Entity)
                .from(Column::GroupId)
                .to(group::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
