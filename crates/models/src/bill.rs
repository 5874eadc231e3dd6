use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{child, errors::ModelError, kindergarten, timestamps, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bill")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub year: i16,
    pub month: String,
    pub deadline: Option<Date>,
    pub bill_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub payment_sum: Decimal,
    pub kindergarten_id: i32,
    pub child_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kindergarten,
    Child,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Kindergarten => Entity::belongs_to(kindergarten::Entity)
                .from(Column::KindergartenId)
                .to(kindergarten::Column::Id)
                .into(),
            Relation::Child => Entity::belongs_to(child::Entity).from(Column::ChildId).to(child::Column::Id).into(),
        }
    }
}

impl Related<kindergarten::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kindergarten.def()
    }
}

impl Related<child::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Child.def()
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

pub fn validate_month(month: &str) -> Result<(), ModelError> {
    validation::not_blank("month", month)
}

pub fn validate_payment_sum(payment_sum: Decimal) -> Result<(), ModelError> {
    validation::non_negative("payment_sum", payment_sum)
}
