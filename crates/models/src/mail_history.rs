use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, timestamps, validation};

/// One delivered mail. Rows are only ever inserted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mail_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub addresses: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub created_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            self.created_date = Set(timestamps::now());
        }
        Ok(self)
    }
}

pub fn validate_addresses(addresses: &str) -> Result<(), ModelError> {
    validation::not_blank("addresses", addresses)
}
