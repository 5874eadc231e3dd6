use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{child, child_activities, errors::ModelError, kindergarten, kindergarten_activity, timestamps, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub status: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<child::Entity> for Entity {
    fn to() -> RelationDef {
        child_activities::Relation::Child.def()
    }
    fn via() -> Option<RelationDef> {
        Some(child_activities::Relation::Activity.def().rev())
    }
}

impl Related<kindergarten::Entity> for Entity {
    fn to() -> RelationDef {
        kindergarten_activity::Relation::Kindergarten.def()
    }
    fn via() -> Option<RelationDef> {
        Some(kindergarten_activity::Relation::Activity.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        timestamps::stamp(&mut self.created_at, &mut self.updated_at, insert);
        Ok(self)
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    validation::not_blank("name", name)
}

pub fn validate_price(price: Decimal) -> Result<(), ModelError> {
    validation::non_negative("price", price)
}
