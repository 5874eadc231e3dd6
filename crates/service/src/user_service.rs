use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use models::user;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::password::hash_password;
use crate::{audit, repository};

const ENTITY: &str = "User";

#[derive(Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role_id: i32,
    #[serde(default)]
    pub status: Option<bool>,
}

#[derive(Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i32>,
    pub status: Option<bool>,
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    username: Option<&str>,
    email: Option<&str>,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    if let Some(username) = username {
        if repository::is_taken::<user::Entity, _>(conn, user::Column::Username, username, user::Column::Id, exclude).await? {
            warn!(service = "user", event = "conflict", username = %username);
            return Err(ServiceError::Conflict(format!("Username {} already exists", username)));
        }
    }
    if let Some(email) = email {
        if repository::is_taken::<user::Entity, _>(conn, user::Column::Email, email, user::Column::Id, exclude).await? {
            warn!(service = "user", event = "conflict", email = %email);
            return Err(ServiceError::Conflict(format!("Email {} already exists", email)));
        }
    }
    Ok(())
}

/// Create a user; the password is stored as an argon2 hash.
#[instrument(skip(db, input), fields(username = %input.username))]
pub async fn create_user(db: &DatabaseConnection, input: CreateUser) -> Result<user::Model, ServiceError> {
    user::validate_new(&input.username, &input.password, &input.email)?;
    let hash = hash_password(&input.password)?;

    let txn = db.begin().await?;
    ensure_unique(&txn, Some(&input.username), Some(&input.email), None).await?;
    let created = user::ActiveModel {
        username: Set(input.username),
        password: Set(hash),
        email: Set(input.email),
        role_id: Set(input.role_id),
        status: Set(input.status.unwrap_or(true)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "user", event = "created", id = created.id);
    Ok(created)
}

pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    repository::find_by_id::<user::Entity, _>(db, ENTITY, id).await
}

pub async fn get_user_by_username(db: &DatabaseConnection, username: &str) -> Result<user::Model, ServiceError> {
    repository::find_one_by::<user::Entity, _>(db, user::Column::Username, username)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "username", username))
}

pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<user::Model, ServiceError> {
    repository::find_one_by::<user::Entity, _>(db, user::Column::Email, email)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "email", email))
}

pub async fn list_users(db: &DatabaseConnection, req: PageRequest) -> Result<Page<user::Model>, ServiceError> {
    repository::fetch_page::<user::Entity, _>(db, req, user::Column::Id).await
}

/// Merge the supplied fields. A new password is re-hashed; a new email is
/// re-checked for shape.
#[instrument(skip(db, input))]
pub async fn update_user(db: &DatabaseConnection, id: i32, input: UpdateUser) -> Result<user::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<user::Entity, _>(&txn, ENTITY, id).await?;
    let mut am: user::ActiveModel = current.clone().into();

    if let Some(email) = &input.email {
        if !common::validation::is_valid_email(email) {
            return Err(ServiceError::Validation("Invalid email format".into()));
        }
    }
    let new_username = input.username.as_deref().filter(|u| *u != current.username);
    let new_email = input.email.as_deref().filter(|e| *e != current.email);
    ensure_unique(&txn, new_username, new_email, Some(id)).await?;

    if let Some(username) = input.username {
        models::validation::not_blank("username", &username)?;
        am.username = Set(username);
    }
    if let Some(email) = input.email {
        am.email = Set(email);
    }
    if let Some(password) = input.password {
        models::validation::not_blank("password", &password)?;
        am.password = Set(hash_password(&password)?);
    }
    if let Some(role_id) = input.role_id {
        am.role_id = Set(role_id);
    }
    if let Some(status) = input.status {
        am.status = Set(status);
    }

    if !am.is_changed() {
        return Ok(current);
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(service = "user", event = "updated", id);
    Ok(updated)
}

pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<user::Entity, _>(&txn, ENTITY, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::test_support::get_db;

    fn admin() -> CreateUser {
        CreateUser {
            username: "admin".into(),
            password: "s3cret-pass".into(),
            email: "admin@vrtic.rs".into(),
            role_id: 1,
            status: None,
        }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = create_user(&db, admin()).await?;
        assert_ne!(u.password, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &u.password));

        let json = serde_json::to_value(&u)?;
        assert!(json.get("password").is_none());

        assert_eq!(get_user_by_username(&db, "admin").await?.id, u.id);
        assert_eq!(get_user_by_email(&db, "admin@vrtic.rs").await?.id, u.id);

        let updated = update_user(&db, u.id, UpdateUser { password: Some("another-pass".into()), ..Default::default() }).await?;
        assert!(verify_password("another-pass", &updated.password));
        assert_eq!(updated.username, "admin");

        delete_user(&db, u.id).await?;
        assert!(matches!(get_user(&db, u.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_user_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = create_user(&db, admin()).await?;
        assert_eq!(update_user(&db, u.id, UpdateUser::default()).await?, u);
        assert_eq!(get_user(&db, u.id).await?, u);
        Ok(())
    }

    #[tokio::test]
    async fn username_and_email_are_unique() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_user(&db, admin()).await?;
        let same_name = create_user(&db, CreateUser { email: "other@vrtic.rs".into(), ..admin() }).await;
        assert!(matches!(same_name, Err(ServiceError::Conflict(_))));
        let same_email = create_user(&db, CreateUser { username: "other".into(), ..admin() }).await;
        assert!(matches!(same_email, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn email_update_is_revalidated() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = create_user(&db, admin()).await?;
        let res = update_user(&db, u.id, UpdateUser { email: Some("broken".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
