use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::mail::MailError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
    #[error("mail error: {0}")]
    Mail(#[from] MailError),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        Self::NotFound(format!("{} with id {} not found", entity, id))
    }

    pub fn not_found_by(entity: &str, field: &str, value: &str) -> Self {
        Self::NotFound(format!("{} with {} {} not found", entity, field, value))
    }

    pub fn missing_reference(what: &str) -> Self {
        Self::Validation(format!("{} must be provided", what))
    }
}

/// Constraint violations raised by the store are conflicts, whatever the
/// application-level pre-check concluded; everything else is a store failure.
impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("unique constraint violated: {}", msg))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("record is still referenced: {}", msg))
            }
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_activity, seed_child, seed_child_refs};
    use models::{activity, child};
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Set};

    #[tokio::test]
    async fn store_unique_violation_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        seed_activity(&db, "Swimming").await?;
        // straight to the store, no service pre-check
        let err = activity::ActiveModel {
            name: Set("Swimming".into()),
            price: Set(Decimal::ZERO),
            status: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect_err("duplicate name must be rejected by the unique index");
        assert!(matches!(ServiceError::from(err), ServiceError::Conflict(_)));
        Ok(())
    }

    #[tokio::test]
    async fn child_key_index_rejects_case_variant() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let first = seed_child(&db, refs).await?;
        let err = child::ActiveModel {
            name: Set(first.name.to_uppercase()),
            surname: Set(first.surname.to_uppercase()),
            sibling_order: Set(2),
            birthday: Set(None),
            status: Set(true),
            group_id: Set(refs.0),
            parent_id: Set(refs.1),
            kindergarten_id: Set(refs.2),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect_err("case variant of an existing child must hit the key index");
        assert!(matches!(ServiceError::from(err), ServiceError::Conflict(_)));
        Ok(())
    }

    #[test]
    fn other_store_errors_stay_failures() {
        let e = ServiceError::from(DbErr::Custom("connection reset".into()));
        assert!(matches!(e, ServiceError::Db(m) if m.contains("connection reset")));
    }
}
