use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{child, errors::ModelError, kindergarten, kindergarten_groups, timestamps, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub discount: Decimal,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Children,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Children => Entity::has_many(child::Entity).into(),
        }
    }
}

impl Related<child::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Children.def()
    }
}

impl Related<kindergarten::Entity> for Entity {
    fn to() -> RelationDef {
        kindergarten_groups::Relation::Kindergarten.def()
    }
    fn via() -> Option<RelationDef> {
        Some(kindergarten_groups::Relation::Group.def().rev())
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

pub fn validate_discount(discount: Decimal) -> Result<(), ModelError> {
    validation::non_negative("discount", discount)
}
