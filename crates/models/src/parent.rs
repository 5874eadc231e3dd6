use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{child, errors::ModelError, timestamps, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parent")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
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

pub fn validate_new(name: &str, surname: &str, email: &str, address: &str) -> Result<(), ModelError> {
    validation::not_blank("name", name)?;
    validation::not_blank("surname", surname)?;
    validation::email("email", email)?;
    validation::not_blank("address", address)
}
