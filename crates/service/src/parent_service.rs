use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, warn};

use models::parent;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::{audit, repository};

const ENTITY: &str = "Parent";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateParent {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub address: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateParent {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

async fn ensure_email_free<C: ConnectionTrait>(conn: &C, email: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
    if repository::is_taken::<parent::Entity, _>(conn, parent::Column::Email, email, parent::Column::Id, exclude).await? {
        warn!(service = "parent", event = "conflict", email = %email);
        return Err(ServiceError::Conflict(format!("Email {} already exists", email)));
    }
    Ok(())
}

/// Create a parent with a unique email.
pub async fn create_parent(db: &DatabaseConnection, input: CreateParent) -> Result<parent::Model, ServiceError> {
    parent::validate_new(&input.name, &input.surname, &input.email, &input.address)?;

    let txn = db.begin().await?;
    ensure_email_free(&txn, &input.email, None).await?;
    let created = parent::ActiveModel {
        name: Set(input.name),
        surname: Set(input.surname),
        email: Set(input.email),
        address: Set(input.address),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "parent", event = "created", id = created.id);
    Ok(created)
}

pub async fn get_parent(db: &DatabaseConnection, id: i32) -> Result<parent::Model, ServiceError> {
    repository::find_by_id::<parent::Entity, _>(db, ENTITY, id).await
}

/// Get parent by email.
pub async fn get_parent_by_email(db: &DatabaseConnection, email: &str) -> Result<parent::Model, ServiceError> {
    repository::find_one_by::<parent::Entity, _>(db, parent::Column::Email, email)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "email", email))
}

pub async fn list_parents(db: &DatabaseConnection, req: PageRequest) -> Result<Page<parent::Model>, ServiceError> {
    repository::fetch_page::<parent::Entity, _>(db, req, parent::Column::Id).await
}

/// Merge the supplied fields; a new email is re-checked for shape and uniqueness.
pub async fn update_parent(db: &DatabaseConnection, id: i32, input: UpdateParent) -> Result<parent::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<parent::Entity, _>(&txn, ENTITY, id).await?;
    let mut am: parent::ActiveModel = current.clone().into();

    if let Some(email) = input.email {
        if !common::validation::is_valid_email(&email) {
            return Err(ServiceError::Validation("Invalid email format".into()));
        }
        if email != current.email {
            ensure_email_free(&txn, &email, Some(id)).await?;
        }
        am.email = Set(email);
    }
    if let Some(name) = input.name {
        models::validation::not_blank("name", &name)?;
        am.name = Set(name);
    }
    if let Some(surname) = input.surname {
        models::validation::not_blank("surname", &surname)?;
        am.surname = Set(surname);
    }
    if let Some(address) = input.address {
        models::validation::not_blank("address", &address)?;
        am.address = Set(address);
    }

    if !am.is_changed() {
        return Ok(current);
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(service = "parent", event = "updated", id);
    Ok(updated)
}

/// Delete a parent. Fails with a conflict while children still reference it.
pub async fn delete_parent(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<parent::Entity, _>(&txn, ENTITY, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn marko() -> CreateParent {
        CreateParent {
            name: "Marko".into(),
            surname: "Jovic".into(),
            email: "marko@example.com".into(),
            address: "Glavna 2".into(),
        }
    }

    #[tokio::test]
    async fn parent_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = create_parent(&db, marko()).await?;
        assert_eq!(get_parent_by_email(&db, "marko@example.com").await?.id, p.id);

        let moved = update_parent(&db, p.id, UpdateParent { address: Some("Nova 5".into()), ..Default::default() }).await?;
        assert_eq!(moved.address, "Nova 5");
        assert_eq!(moved.email, p.email);

        delete_parent(&db, p.id).await?;
        assert!(matches!(get_parent(&db, p.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_parent_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = create_parent(&db, marko()).await?;
        assert_eq!(update_parent(&db, p.id, UpdateParent::default()).await?, p);
        assert_eq!(get_parent(&db, p.id).await?, p);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_email_update_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = create_parent(&db, marko()).await?;
        let res = update_parent(&db, p.id, UpdateParent { email: Some("not-an-email".into()), ..Default::default() }).await;
        match res {
            Err(ServiceError::Validation(msg)) => assert_eq!(msg, "Invalid email format"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(get_parent(&db, p.id).await?.email, "marko@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_parent(&db, marko()).await?;
        let res = create_parent(&db, CreateParent { name: "Ana".into(), ..marko() }).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_blank_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = create_parent(&db, CreateParent { name: " ".into(), ..marko() }).await;
        assert!(matches!(res, Err(ServiceError::Model(models::errors::ModelError::Field { field: "name", .. }))));
        Ok(())
    }
}
