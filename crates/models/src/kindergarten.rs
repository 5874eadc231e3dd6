use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    activity, bill, child, errors::ModelError, group, kindergarten_account, kindergarten_activity,
    kindergarten_groups, timestamps, validation,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kindergarten")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub logo: Option<String>,
    #[sea_orm(unique)]
    pub account_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Account,
    Children,
    Bills,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Account => Entity::belongs_to(kindergarten_account::Entity)
                .from(Column::AccountId)
                .to(kindergarten_account::Column::Id)
                .into(),
            Relation::Children => Entity::has_many(child::Entity).into(),
            Relation::Bills => Entity::has_many(bill::Entity).into(),
        }
    }
}

impl Related<kindergarten_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<child::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Children.def()
    }
}

impl Related<bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<group::Entity> for Entity {
    fn to() -> RelationDef {
        kindergarten_groups::Relation::Group.def()
    }
    fn via() -> Option<RelationDef> {
        Some(kindergarten_groups::Relation::Kindergarten.def().rev())
    }
}

impl Related<activity::Entity> for Entity {
    fn to() -> RelationDef {
        kindergarten_activity::Relation::Activity.def()
    }
    fn via() -> Option<RelationDef> {
        Some(kindergarten_activity::Relation::Kindergarten.def().rev())
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

pub fn validate_new(name: &str, address: &str, email: &str) -> Result<(), ModelError> {
    validation::not_blank("name", name)?;
    validation::not_blank("address", address)?;
    validation::email("email", email)
}
