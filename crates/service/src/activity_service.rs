use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, warn};

use models::activity;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::{audit, repository};

const ENTITY: &str = "Activity";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateActivity {
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub status: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateActivity {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<bool>,
}

/// Create an activity with a unique name.
pub async fn create_activity(db: &DatabaseConnection, input: CreateActivity) -> Result<activity::Model, ServiceError> {
    activity::validate_name(&input.name)?;
    let price = input.price.unwrap_or(Decimal::ZERO);
    activity::validate_price(price)?;

    let txn = db.begin().await?;
    if repository::is_taken::<activity::Entity, _>(&txn, activity::Column::Name, input.name.clone(), activity::Column::Id, None).await? {
        warn!(service = "activity", event = "conflict", name = %input.name);
        return Err(ServiceError::Conflict(format!("Activity {} already exists", input.name)));
    }
    let created = activity::ActiveModel {
        name: Set(input.name),
        price: Set(price),
        status: Set(input.status.unwrap_or(true)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "activity", event = "created", id = created.id);
    Ok(created)
}

/// Get activity by id.
pub async fn get_activity(db: &DatabaseConnection, id: i32) -> Result<activity::Model, ServiceError> {
    repository::find_by_id::<activity::Entity, _>(db, ENTITY, id).await
}

/// Get activity by its unique name.
pub async fn get_activity_by_name(db: &DatabaseConnection, name: &str) -> Result<activity::Model, ServiceError> {
    repository::find_one_by::<activity::Entity, _>(db, activity::Column::Name, name)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "name", name))
}

/// Page through activities in id order.
pub async fn list_activities(db: &DatabaseConnection, req: PageRequest) -> Result<Page<activity::Model>, ServiceError> {
    repository::fetch_page::<activity::Entity, _>(db, req, activity::Column::Id).await
}

/// Merge the supplied fields into an existing activity.
pub async fn update_activity(db: &DatabaseConnection, id: i32, input: UpdateActivity) -> Result<activity::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<activity::Entity, _>(&txn, ENTITY, id).await?;
    let mut am: activity::ActiveModel = current.clone().into();

    if let Some(name) = input.name {
        activity::validate_name(&name)?;
        if name != current.name
            && repository::is_taken::<activity::Entity, _>(&txn, activity::Column::Name, name.clone(), activity::Column::Id, Some(id)).await?
        {
            return Err(ServiceError::Conflict(format!("Activity {} already exists", name)));
        }
        am.name = Set(name);
    }
    if let Some(price) = input.price {
        activity::validate_price(price)?;
        am.price = Set(price);
    }
    if let Some(status) = input.status {
        am.status = Set(status);
    }

    if !am.is_changed() {
        return Ok(current);
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(service = "activity", event = "updated", id);
    Ok(updated)
}

/// Delete an activity; its child and kindergarten links go with it.
pub async fn delete_activity(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<activity::Entity, _>(&txn, ENTITY, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn swimming() -> CreateActivity {
        CreateActivity { name: "Swimming".into(), price: Some(Decimal::new(1000, 2)), status: None }
    }

    #[tokio::test]
    async fn activity_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let a = create_activity(&db, swimming()).await?;
        assert!(a.id > 0);
        assert!(a.status);

        let found = get_activity(&db, a.id).await?;
        assert_eq!(found, a);
        assert_eq!(get_activity_by_name(&db, "Swimming").await?.id, a.id);

        let updated = update_activity(&db, a.id, UpdateActivity { price: Some(Decimal::new(1500, 2)), ..Default::default() }).await?;
        assert_eq!(updated.price, Decimal::new(1500, 2));
        assert_eq!(updated.name, "Swimming");

        delete_activity(&db, a.id).await?;
        assert!(matches!(get_activity(&db, a.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_activity(&db, swimming()).await?;
        let second = create_activity(&db, swimming()).await;
        assert!(matches!(second, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_record_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_activity(&db, swimming()).await?;
        let same = update_activity(&db, a.id, UpdateActivity::default()).await?;
        assert_eq!(same, a);
        Ok(())
    }

    #[tokio::test]
    async fn rename_onto_existing_conflicts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_activity(&db, swimming()).await?;
        let dance = create_activity(&db, CreateActivity { name: "Dance".into(), price: None, status: Some(false) }).await?;
        assert_eq!(dance.price, Decimal::ZERO);
        let res = update_activity(&db, dance.id, UpdateActivity { name: Some("Swimming".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        // keeping its own name is not a conflict
        update_activity(&db, dance.id, UpdateActivity { name: Some("Dance".into()), ..Default::default() }).await?;
        Ok(())
    }

    #[tokio::test]
    async fn negative_price_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = create_activity(&db, CreateActivity { name: "Chess".into(), price: Some(Decimal::new(-1, 0)), status: None }).await;
        assert!(matches!(res, Err(ServiceError::Model(_))));
        Ok(())
    }
}
