use std::marker::PhantomData;

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, LoaderTrait, ModelTrait, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use models::{activity, group, kindergarten, kindergarten_activity, kindergarten_groups};
use crate::account_service::{self, load_account};
use crate::associations::Association;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::patch::Patch;
use crate::{audit, repository};

const ENTITY: &str = "Kindergarten";

const GROUPS: Association<kindergarten_groups::Entity, group::Entity> = Association {
    owner_col: kindergarten_groups::Column::KindergartenId,
    related_col: kindergarten_groups::Column::GroupId,
    related_pk: group::Column::Id,
    related_name: "Group",
    _marker: PhantomData,
};

const ACTIVITIES: Association<kindergarten_activity::Entity, activity::Entity> = Association {
    owner_col: kindergarten_activity::Column::KindergartenId,
    related_col: kindergarten_activity::Column::ActivityId,
    related_pk: activity::Column::Id,
    related_name: "Activity",
    _marker: PhantomData,
};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateKindergarten {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub email: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub account_id: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateKindergarten {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Patch<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub logo: Patch<String>,
    pub account_id: Option<i32>,
}

/// Kindergarten together with its linked groups and activities.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KindergartenDetails {
    #[serde(flatten)]
    pub kindergarten: kindergarten::Model,
    pub groups: Vec<group::Model>,
    pub activities: Vec<activity::Model>,
}

async fn details<C: ConnectionTrait>(conn: &C, kg: kindergarten::Model) -> Result<KindergartenDetails, ServiceError> {
    let groups = kg.find_related(group::Entity).order_by_asc(group::Column::Id).all(conn).await?;
    let activities = kg.find_related(activity::Entity).order_by_asc(activity::Column::Id).all(conn).await?;
    Ok(KindergartenDetails { kindergarten: kg, groups, activities })
}

async fn load<C: ConnectionTrait>(conn: &C, id: i32) -> Result<kindergarten::Model, ServiceError> {
    repository::find_by_id::<kindergarten::Entity, _>(conn, ENTITY, id).await
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    name: Option<&str>,
    email: Option<&str>,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    use kindergarten::{Column, Entity};
    if let Some(name) = name {
        if repository::is_taken::<Entity, _>(conn, Column::Name, name, Column::Id, exclude).await? {
            warn!(service = "kindergarten", event = "conflict", name = %name);
            return Err(ServiceError::Conflict(format!("Kindergarten with name {} already exists", name)));
        }
    }
    if let Some(email) = email {
        if repository::is_taken::<Entity, _>(conn, Column::Email, email, Column::Id, exclude).await? {
            warn!(service = "kindergarten", event = "conflict", email = %email);
            return Err(ServiceError::Conflict(format!("Kindergarten with email {} already exists", email)));
        }
    }
    Ok(())
}

/// The account must exist and must not already belong to another kindergarten.
async fn claim_account<C: ConnectionTrait>(conn: &C, account_id: i32, exclude: Option<i32>) -> Result<(), ServiceError> {
    load_account(conn, account_id).await?;
    if repository::is_taken::<kindergarten::Entity, _>(
        conn,
        kindergarten::Column::AccountId,
        account_id,
        kindergarten::Column::Id,
        exclude,
    )
    .await?
    {
        return Err(ServiceError::Conflict(format!(
            "{} with id = {} is already linked to another kindergarten",
            account_service::ENTITY,
            account_id
        )));
    }
    Ok(())
}

/// Create a kindergarten bound to an existing, unlinked account.
pub async fn create_kindergarten(db: &DatabaseConnection, input: CreateKindergarten) -> Result<KindergartenDetails, ServiceError> {
    kindergarten::validate_new(&input.name, &input.address, &input.email)?;
    let account_id = input.account_id.ok_or_else(|| ServiceError::missing_reference("Account id"))?;

    let txn = db.begin().await?;
    claim_account(&txn, account_id, None).await?;
    ensure_unique(&txn, Some(&input.name), Some(&input.email), None).await?;
    let created = kindergarten::ActiveModel {
        name: Set(input.name),
        address: Set(input.address),
        phone_number: Set(input.phone_number),
        email: Set(input.email),
        logo: Set(input.logo),
        account_id: Set(account_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "created", id = created.id, account_id);
    Ok(KindergartenDetails { kindergarten: created, groups: Vec::new(), activities: Vec::new() })
}

pub async fn get_kindergarten(db: &DatabaseConnection, id: i32) -> Result<KindergartenDetails, ServiceError> {
    let kg = load(db, id).await?;
    details(db, kg).await
}

pub async fn get_kindergarten_by_name(db: &DatabaseConnection, name: &str) -> Result<KindergartenDetails, ServiceError> {
    let kg = repository::find_one_by::<kindergarten::Entity, _>(db, kindergarten::Column::Name, name)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "name", name))?;
    details(db, kg).await
}

pub async fn get_kindergarten_by_email(db: &DatabaseConnection, email: &str) -> Result<KindergartenDetails, ServiceError> {
    let kg = repository::find_one_by::<kindergarten::Entity, _>(db, kindergarten::Column::Email, email)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "email", email))?;
    details(db, kg).await
}

/// Page of kindergartens; the links of the whole page are loaded in two queries.
pub async fn list_kindergartens(db: &DatabaseConnection, req: PageRequest) -> Result<Page<KindergartenDetails>, ServiceError> {
    let page = repository::fetch_page::<kindergarten::Entity, _>(db, req, kindergarten::Column::Id).await?;
    let groups = page.content.load_many_to_many(group::Entity, kindergarten_groups::Entity, db).await?;
    let activities = page.content.load_many_to_many(activity::Entity, kindergarten_activity::Entity, db).await?;
    let mut links = groups.into_iter().zip(activities);
    Ok(page.map(|kindergarten| {
        let (groups, activities) = links.next().unwrap_or_default();
        KindergartenDetails { kindergarten, groups, activities }
    }))
}

/// Merge the supplied fields; email is re-validated and a new account must be free.
pub async fn update_kindergarten(db: &DatabaseConnection, id: i32, input: UpdateKindergarten) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    let mut am: kindergarten::ActiveModel = current.clone().into();

    if let Some(email) = &input.email {
        if !common::validation::is_valid_email(email) {
            return Err(ServiceError::Validation("Invalid email format".into()));
        }
    }
    let new_name = input.name.as_deref().filter(|v| *v != current.name);
    let new_email = input.email.as_deref().filter(|v| *v != current.email);
    ensure_unique(&txn, new_name, new_email, Some(id)).await?;

    if let Some(account_id) = input.account_id {
        if account_id != current.account_id {
            claim_account(&txn, account_id, Some(id)).await?;
        }
        am.account_id = Set(account_id);
    }
    if let Some(name) = input.name {
        models::validation::not_blank("name", &name)?;
        am.name = Set(name);
    }
    if let Some(address) = input.address {
        models::validation::not_blank("address", &address)?;
        am.address = Set(address);
    }
    if let Some(email) = input.email {
        am.email = Set(email);
    }
    input.phone_number.apply(&mut am.phone_number);
    input.logo.apply(&mut am.logo);

    let saved = if am.is_changed() { am.update(&txn).await? } else { current };
    let out = details(&txn, saved).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "updated", id);
    Ok(out)
}

/// Delete a kindergarten and its group/activity links. Fails with a conflict
/// while children or bills still reference it.
pub async fn delete_kindergarten(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Link the listed groups; all ids must exist or nothing changes.
pub async fn add_groups(db: &DatabaseConnection, id: i32, group_ids: &[i32]) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let added = GROUPS.add(&txn, kg.id, group_ids).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "groups_added", id, added);
    Ok(out)
}

/// Unlink the listed groups; ids that are not linked are ignored.
pub async fn remove_groups(db: &DatabaseConnection, id: i32, group_ids: &[i32]) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let removed = GROUPS.remove(&txn, kg.id, group_ids).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "groups_removed", id, removed);
    Ok(out)
}

pub async fn clear_groups(db: &DatabaseConnection, id: i32) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let removed = GROUPS.clear(&txn, kg.id).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "groups_cleared", id, removed);
    Ok(out)
}

/// Link the listed activities; all ids must exist or nothing changes.
pub async fn add_activities(db: &DatabaseConnection, id: i32, activity_ids: &[i32]) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let added = ACTIVITIES.add(&txn, kg.id, activity_ids).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "activities_added", id, added);
    Ok(out)
}

pub async fn remove_activities(db: &DatabaseConnection, id: i32, activity_ids: &[i32]) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let removed = ACTIVITIES.remove(&txn, kg.id, activity_ids).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "activities_removed", id, removed);
    Ok(out)
}

pub async fn clear_activities(db: &DatabaseConnection, id: i32) -> Result<KindergartenDetails, ServiceError> {
    let txn = db.begin().await?;
    let kg = load(&txn, id).await?;
    let removed = ACTIVITIES.clear(&txn, kg.id).await?;
    let out = details(&txn, kg).await?;
    txn.commit().await?;
    info!(service = "kindergarten", event = "activities_cleared", id, removed);
    Ok(out)
}
