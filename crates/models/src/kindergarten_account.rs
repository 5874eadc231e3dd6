use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, kindergarten, timestamps, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kindergarten_account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bank_name: String,
    #[sea_orm(unique)]
    pub account_number: String,
    pub pib: String,
    #[sea_orm(unique)]
    pub identification_number: String,
    pub activity_code: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Kindergarten,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Kindergarten => Entity::has_one(kindergarten::Entity).into(),
        }
    }
}

impl Related<kindergarten::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kindergarten.def()
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

/// Tax number check used by both create and update.
pub fn validate_pib(pib: &str) -> Result<(), ModelError> {
    if !common::validation::is_valid_pib(pib) {
        return Err(ModelError::Validation("PIB must have exactly 9 digits".into()));
    }
    Ok(())
}

pub fn validate_new(
    bank_name: &str,
    account_number: &str,
    pib: &str,
    identification_number: &str,
) -> Result<(), ModelError> {
    validation::not_blank("bank_name", bank_name)?;
    validation::not_blank("account_number", account_number)?;
    validation::not_blank("pib", pib)?;
    validate_pib(pib)?;
    validation::not_blank("identification_number", identification_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pib_message() {
        let err = validate_pib("12345").unwrap_err();
        assert_eq!(err.to_string(), "validation error: PIB must have exactly 9 digits");
    }

    #[test]
    fn new_account_requires_bank_name() {
        assert!(matches!(
            validate_new("", "160-1", "123456789", "0801"),
            Err(ModelError::Field { field: "bank_name", .. })
        ));
        assert!(validate_new("Banca Intesa", "160-1", "123456789", "0801").is_ok());
    }
}
