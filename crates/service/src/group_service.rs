use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, warn};

use models::group;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::{audit, repository};

const ENTITY: &str = "Group";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub active: Option<bool>,
}

async fn ensure_name_free<C: sea_orm::ConnectionTrait>(conn: &C, name: &str, exclude: Option<i32>) -> Result<(), ServiceError> {
    if repository::is_taken::<group::Entity, _>(conn, group::Column::Name, name, group::Column::Id, exclude).await? {
        warn!(service = "group", event = "conflict", name = %name);
        return Err(ServiceError::Conflict(format!("Group with name {} already exists", name)));
    }
    Ok(())
}

/// Create a group with a unique name.
pub async fn create_group(db: &DatabaseConnection, input: CreateGroup) -> Result<group::Model, ServiceError> {
    group::validate_name(&input.name)?;
    group::validate_price(input.price)?;
    let discount = input.discount.unwrap_or(Decimal::ZERO);
    group::validate_discount(discount)?;

    let txn = db.begin().await?;
    ensure_name_free(&txn, &input.name, None).await?;
    let created = group::ActiveModel {
        name: Set(input.name),
        price: Set(input.price),
        discount: Set(discount),
        active: Set(input.active.unwrap_or(true)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "group", event = "created", id = created.id);
    Ok(created)
}

/// Get group by id.
pub async fn get_group(db: &DatabaseConnection, id: i32) -> Result<group::Model, ServiceError> {
    repository::find_by_id::<group::Entity, _>(db, ENTITY, id).await
}

/// Get group by its unique name.
pub async fn get_group_by_name(db: &DatabaseConnection, name: &str) -> Result<group::Model, ServiceError> {
    repository::find_one_by::<group::Entity, _>(db, group::Column::Name, name)
        .await?
        .ok_or_else(|| ServiceError::not_found_by(ENTITY, "name", name))
}

pub async fn list_groups(db: &DatabaseConnection, req: PageRequest) -> Result<Page<group::Model>, ServiceError> {
    repository::fetch_page::<group::Entity, _>(db, req, group::Column::Id).await
}

/// Merge the supplied fields into an existing group.
pub async fn update_group(db: &DatabaseConnection, id: i32, input: UpdateGroup) -> Result<group::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<group::Entity, _>(&txn, ENTITY, id).await?;
    let mut am: group::ActiveModel = current.clone().into();

    if let Some(name) = input.name {
        group::validate_name(&name)?;
        if name != current.name {
            ensure_name_free(&txn, &name, Some(id)).await?;
        }
        am.name = Set(name);
    }
    if let Some(price) = input.price {
        group::validate_price(price)?;
        am.price = Set(price);
    }
    if let Some(discount) = input.discount {
        group::validate_discount(discount)?;
        am.discount = Set(discount);
    }
    if let Some(active) = input.active {
        am.active = Set(active);
    }

    if !am.is_changed() {
        return Ok(current);
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(service = "group", event = "updated", id);
    Ok(updated)
}

/// Delete a group. Fails with a conflict while children are still assigned.
pub async fn delete_group(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = repository::find_by_id::<group::Entity, _>(&txn, ENTITY, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn butterflies() -> CreateGroup {
        CreateGroup { name: "Butterflies".into(), price: Decimal::new(1500000, 2), discount: None, active: None }
    }

    #[tokio::test]
    async fn group_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let g = create_group(&db, butterflies()).await?;
        assert_eq!(g.discount, Decimal::ZERO);
        assert!(g.active);
        assert_eq!(get_group_by_name(&db, "Butterflies").await?, g);

        let updated = update_group(&db, g.id, UpdateGroup { active: Some(false), discount: Some(Decimal::new(10, 0)), ..Default::default() }).await?;
        assert!(!updated.active);
        assert_eq!(updated.price, g.price);

        delete_group(&db, g.id).await?;
        assert!(matches!(get_group(&db, g.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_group_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let g = create_group(&db, butterflies()).await?;
        assert_eq!(update_group(&db, g.id, UpdateGroup::default()).await?, g);
        assert_eq!(get_group(&db, g.id).await?, g);
        Ok(())
    }

    #[tokio::test]
    async fn empty_table_gives_empty_page() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let page = list_groups(&db, PageRequest::new(0, 10)?).await?;
        assert_eq!(page.total_elements, 0);
        assert!(page.content.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn far_page_is_rejected_not_run() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_group(&db, butterflies()).await?;
        assert!(matches!(PageRequest::new(i64::MAX, 3), Err(ServiceError::Validation(_))));
        // largest accepted offset still queries cleanly and comes back empty
        let far = list_groups(&db, PageRequest::new(i64::MAX / 3, 3)?).await?;
        assert!(far.empty);
        assert_eq!(far.total_elements, 1);
        Ok(())
    }

    #[tokio::test]
    async fn paging_is_ordered_by_id() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for name in ["A", "B", "C"] {
            create_group(&db, CreateGroup { name: name.into(), ..butterflies() }).await?;
        }
        let page = list_groups(&db, PageRequest::new(1, 2)?).await?;
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "C");
        assert!(page.last);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_group(&db, butterflies()).await?;
        assert!(matches!(create_group(&db, butterflies()).await, Err(ServiceError::Conflict(_))));
        Ok(())
    }
}
