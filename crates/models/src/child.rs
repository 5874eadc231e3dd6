use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

use crate::{
    activity, bill, child_activities, errors::ModelError, group, kindergarten, parent, timestamps,
    validation,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "child")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// Lowercased `name`, written on every save.
    #[serde(skip)]
    pub name_key: String,
    #[serde(skip)]
    pub surname_key: String,
    pub sibling_order: i32,
    pub birthday: Option<Date>,
    pub status: bool,
    pub group_id: i32,
    pub parent_id: i32,
    pub kindergarten_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Group,
    Parent,
    Kindergarten,
    Bills,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Group => Entity::belongs_to(group::Entity).from(Column::GroupId).to(group::Column::Id).into(),
            Relation::Parent => Entity::belongs_to(parent::Entity).from(Column::ParentId).to(parent::Column::Id).into(),
            Relation::Kindergarten => Entity::belongs_to(kindergarten::Entity)
                .from(Column::KindergartenId)
                .to(kindergarten::Column::Id)
                .into(),
            Relation::Bills => Entity::has_many(bill::Entity).into(),
        }
    }
}

impl Related<group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<parent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parent.def()
    }
}

impl Related<kindergarten::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kindergarten.def()
    }
}

impl Related<bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<activity::Entity> for Entity {
    fn to() -> RelationDef {
        child_activities::Relation::Activity.def()
    }
    fn via() -> Option<RelationDef> {
        Some(child_activities::Relation::Child.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        timestamps::stamp(&mut self.created_at, &mut self.updated_at, insert);
        if let ActiveValue::Set(name) = &self.name {
            self.name_key = Set(name_key(name));
        }
        if let ActiveValue::Set(surname) = &self.surname {
            self.surname_key = Set(name_key(surname));
        }
        Ok(self)
    }
}

pub fn validate_name(name: &str, surname: &str) -> Result<(), ModelError> {
    validation::not_blank("name", name)?;
    validation::not_blank("surname", surname)
}

pub fn validate_sibling_order(sibling_order: i32) -> Result<(), ModelError> {
    validation::at_least("sibling_order", sibling_order, 1)
}

pub fn validate_birthday(birthday: NaiveDate) -> Result<(), ModelError> {
    validation::not_in_future("birthday", birthday)
}

/// Name/surname comparison key for the (name, surname, parent) uniqueness
/// rule. Full Unicode lowercasing, so `Č` and `č` share a key on any store.
pub fn name_key(value: &str) -> String {
    value.to_lowercase()
}
