use std::marker::PhantomData;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use models::{activity, child, child_activities, group, kindergarten, parent};
use crate::associations::Association;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::patch::Patch;
use crate::{audit, repository};

const ENTITY: &str = "Child";

const ACTIVITIES: Association<child_activities::Entity, activity::Entity> = Association {
    owner_col: child_activities::Column::ChildId,
    related_col: child_activities::Column::ActivityId,
    related_pk: activity::Column::Id,
    related_name: "Activity",
    _marker: PhantomData,
};

#[derive(Clone, Debug, Deserialize)]
pub struct CreateChild {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub sibling_order: Option<i32>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub group_id: Option<i32>,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub kindergarten_id: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateChild {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub sibling_order: Option<i32>,
    #[serde(default)]
    pub birthday: Patch<NaiveDate>,
    pub status: Option<bool>,
    pub group_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub kindergarten_id: Option<i32>,
}

/// Child together with the activities it attends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChildDetails {
    #[serde(flatten)]
    pub child: child::Model,
    pub activities: Vec<activity::Model>,
}

async fn details<C: ConnectionTrait>(conn: &C, c: child::Model) -> Result<ChildDetails, ServiceError> {
    let activities = c.find_related(activity::Entity).order_by_asc(activity::Column::Id).all(conn).await?;
    Ok(ChildDetails { child: c, activities })
}

async fn load<C: ConnectionTrait>(conn: &C, id: i32) -> Result<child::Model, ServiceError> {
    repository::find_by_id::<child::Entity, _>(conn, ENTITY, id).await
}

/// Every referenced row must exist before the child is written.
async fn resolve_refs<C: ConnectionTrait>(
    conn: &C,
    group_id: Option<i32>,
    parent_id: Option<i32>,
    kindergarten_id: Option<i32>,
) -> Result<(), ServiceError> {
    if let Some(id) = group_id {
        repository::find_by_id::<group::Entity, _>(conn, "Group", id).await?;
    }
    if let Some(id) = parent_id {
        repository::find_by_id::<parent::Entity, _>(conn, "Parent", id).await?;
    }
    if let Some(id) = kindergarten_id {
        repository::find_by_id::<kindergarten::Entity, _>(conn, "Kindergarten", id).await?;
    }
    Ok(())
}

/// (name, surname, parent) is unique with name and surname compared case-insensitively.
async fn ensure_unique_triple<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    surname: &str,
    parent_id: i32,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    let mut query = child::Entity::find()
        .filter(child::Column::NameKey.eq(child::name_key(name)))
        .filter(child::Column::SurnameKey.eq(child::name_key(surname)))
        .filter(child::Column::ParentId.eq(parent_id));
    if let Some(id) = exclude {
        query = query.filter(child::Column::Id.ne(id));
    }
    if query.one(conn).await?.is_some() {
        warn!(service = "child", event = "conflict", parent_id, "duplicate child triple");
        return Err(ServiceError::Conflict("Child already exists with same name, surname and parent".into()));
    }
    Ok(())
}

/// Create a child; group, parent and kindergarten must all be given and exist.
pub async fn create_child(db: &DatabaseConnection, input: CreateChild) -> Result<ChildDetails, ServiceError> {
    child::validate_name(&input.name, &input.surname)?;
    let sibling_order = input.sibling_order.unwrap_or(1);
    child::validate_sibling_order(sibling_order)?;
    if let Some(b) = input.birthday {
        child::validate_birthday(b)?;
    }
    let group_id = input.group_id.ok_or_else(|| ServiceError::missing_reference("Group id"))?;
    let parent_id = input.parent_id.ok_or_else(|| ServiceError::missing_reference("Parent id"))?;
    let kindergarten_id = input.kindergarten_id.ok_or_else(|| ServiceError::missing_reference("Kindergarten id"))?;

    let txn = db.begin().await?;
    resolve_refs(&txn, Some(group_id), Some(parent_id), Some(kindergarten_id)).await?;
    ensure_unique_triple(&txn, &input.name, &input.surname, parent_id, None).await?;
    let created = child::ActiveModel {
        name: Set(input.name),
        surname: Set(input.surname),
        sibling_order: Set(sibling_order),
        birthday: Set(input.birthday),
        status: Set(input.status.unwrap_or(true)),
        group_id: Set(group_id),
        parent_id: Set(parent_id),
        kindergarten_id: Set(kindergarten_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "child", event = "created", id = created.id, parent_id, kindergarten_id);
    Ok(ChildDetails { child: created, activities: Vec::new() })
}

pub async fn get_child(db: &DatabaseConnection, id: i32) -> Result<ChildDetails, ServiceError> {
    let c = load(db, id).await?;
    details(db, c).await
}

pub async fn list_children(db: &DatabaseConnection, req: PageRequest) -> Result<Page<ChildDetails>, ServiceError> {
    let page = repository::fetch_page::<child::Entity, _>(db, req, child::Column::Id).await?;
    let activities = page.content.load_many_to_many(activity::Entity, child_activities::Entity, db).await?;
    let mut links = activities.into_iter();
    Ok(page.map(|child| ChildDetails { child, activities: links.next().unwrap_or_default() }))
}

/// Merge the supplied fields. When any part of the (name, surname, parent)
/// triple changes, the merged triple is checked against the other children.
pub async fn update_child(db: &DatabaseConnection, id: i32, input: UpdateChild) -> Result<ChildDetails, ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    let mut am: child::ActiveModel = current.clone().into();

    resolve_refs(&txn, input.group_id, input.parent_id, input.kindergarten_id).await?;

    if input.name.is_some() || input.surname.is_some() || input.parent_id.is_some() {
        let name = input.name.as_deref().unwrap_or(&current.name);
        let surname = input.surname.as_deref().unwrap_or(&current.surname);
        child::validate_name(name, surname)?;
        ensure_unique_triple(&txn, name, surname, input.parent_id.unwrap_or(current.parent_id), Some(id)).await?;
    }

    if let Some(name) = input.name {
        am.name = Set(name);
    }
    if let Some(surname) = input.surname {
        am.surname = Set(surname);
    }
    if let Some(sibling_order) = input.sibling_order {
        child::validate_sibling_order(sibling_order)?;
        am.sibling_order = Set(sibling_order);
    }
    if let Some(b) = input.birthday.as_value() {
        child::validate_birthday(*b)?;
    }
    input.birthday.apply(&mut am.birthday);
    if let Some(status) = input.status {
        am.status = Set(status);
    }
    if let Some(group_id) = input.group_id {
        am.group_id = Set(group_id);
    }
    if let Some(parent_id) = input.parent_id {
        am.parent_id = Set(parent_id);
    }
    if let Some(kindergarten_id) = input.kindergarten_id {
        am.kindergarten_id = Set(kindergarten_id);
    }

    let saved = if am.is_changed() { am.update(&txn).await? } else { current };
    let out = details(&txn, saved).await?;
    txn.commit().await?;
    info!(service = "child", event = "updated", id);
    Ok(out)
}

/// Delete a child and its activity links. Fails with a conflict while bills
/// still reference it.
pub async fn delete_child(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn add_activities(db: &DatabaseConnection, id: i32, activity_ids: &[i32]) -> Result<ChildDetails, ServiceError> {
    let txn = db.begin().await?;
    let c = load(&txn, id).await?;
    let added = ACTIVITIES.add(&txn, c.id, activity_ids).await?;
    let out = details(&txn, c).await?;
    txn.commit().await?;
    info!(service = "child", event = "activities_added", id, added);
    Ok(out)
}

pub async fn remove_activities(db: &DatabaseConnection, id: i32, activity_ids: &[i32]) -> Result<ChildDetails, ServiceError> {
    let txn = db.begin().await?;
    let c = load(&txn, id).await?;
    let removed = ACTIVITIES.remove(&txn, c.id, activity_ids).await?;
    let out = details(&txn, c).await?;
    txn.commit().await?;
    info!(service = "child", event = "activities_removed", id, removed);
    Ok(out)
}

pub async fn clear_activities(db: &DatabaseConnection, id: i32) -> Result<ChildDetails, ServiceError> {
    let txn = db.begin().await?;
    let c = load(&txn, id).await?;
    let removed = ACTIVITIES.clear(&txn, c.id).await?;
    let out = details(&txn, c).await?;
    txn.commit().await?;
    info!(service = "child", event = "activities_cleared", id, removed);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_activity, seed_child_refs, seed_parent};

    fn ana(refs: (i32, i32, i32)) -> CreateChild {
        CreateChild {
            name: "Ana".into(),
            surname: "Jovic".into(),
            sibling_order: None,
            birthday: NaiveDate::from_ymd_opt(2020, 3, 14),
            status: None,
            group_id: Some(refs.0),
            parent_id: Some(refs.1),
            kindergarten_id: Some(refs.2),
        }
    }

    #[tokio::test]
    async fn child_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let c = create_child(&db, ana(refs)).await?;
        assert_eq!(c.child.sibling_order, 1);
        assert!(c.child.status);
        assert_eq!(get_child(&db, c.child.id).await?, c);

        let updated = update_child(&db, c.child.id, UpdateChild { birthday: Patch::Null, sibling_order: Some(2), ..Default::default() }).await?;
        assert_eq!(updated.child.birthday, None);
        assert_eq!(updated.child.sibling_order, 2);
        assert_eq!(updated.child.name, "Ana");

        delete_child(&db, c.child.id).await?;
        assert!(matches!(get_child(&db, c.child.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_triple_conflicts_case_insensitively() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        create_child(&db, ana(refs)).await?;
        let again = create_child(&db, CreateChild { name: "ANA".into(), surname: "jovic".into(), ..ana(refs) }).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_triple_folds_serbian_letters() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        create_child(&db, CreateChild { name: "Čarna".into(), surname: "Jović".into(), ..ana(refs) }).await?;
        let again = create_child(&db, CreateChild { name: "ČARNA".into(), surname: "JOVIĆ".into(), ..ana(refs) }).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));
        let lower = create_child(&db, CreateChild { name: "čarna".into(), surname: "jović".into(), ..ana(refs) }).await;
        assert!(matches!(lower, Err(ServiceError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn surrounding_whitespace_is_a_different_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        create_child(&db, ana(refs)).await?;
        let spaced = create_child(&db, CreateChild { name: " Ana".into(), ..ana(refs) }).await?;
        assert_eq!(spaced.child.name, " Ana");
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_child_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let c = create_child(&db, ana(refs)).await?;
        let same = update_child(&db, c.child.id, UpdateChild::default()).await?;
        assert_eq!(same, c);
        Ok(())
    }

    #[tokio::test]
    async fn update_checks_merged_triple() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        create_child(&db, ana(refs)).await?;
        let mila = create_child(&db, CreateChild { name: "Mila".into(), ..ana(refs) }).await?;
        // only the name is supplied; surname and parent come from the stored row
        let res = update_child(&db, mila.child.id, UpdateChild { name: Some("ana".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));

        // same triple under another parent is fine
        let other = seed_parent(&db, "other@example.com").await?;
        let moved = update_child(
            &db,
            mila.child.id,
            UpdateChild { name: Some("Ana".into()), parent_id: Some(other.id), ..Default::default() },
        )
        .await?;
        assert_eq!(moved.child.parent_id, other.id);
        Ok(())
    }

    #[tokio::test]
    async fn references_are_checked() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let missing = create_child(&db, CreateChild { group_id: None, ..ana(refs) }).await;
        assert!(matches!(missing, Err(ServiceError::Validation(_))));
        let unknown = create_child(&db, CreateChild { parent_id: Some(999), ..ana(refs) }).await;
        assert!(matches!(unknown, Err(ServiceError::NotFound(m)) if m == "Parent with id 999 not found"));
        Ok(())
    }

    #[tokio::test]
    async fn future_birthday_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let tomorrow = chrono::Utc::now().date_naive().succ_opt();
        let res = create_child(&db, CreateChild { birthday: tomorrow, ..ana(refs) }).await;
        assert!(matches!(res, Err(ServiceError::Model(_))));
        Ok(())
    }

    #[tokio::test]
    async fn activities_add_remove_clear() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let refs = seed_child_refs(&db).await?;
        let c = create_child(&db, ana(refs)).await?;
        let swim = seed_activity(&db, "Swimming").await?;
        let dance = seed_activity(&db, "Dance").await?;

        let out = add_activities(&db, c.child.id, &[swim.id, dance.id, swim.id]).await?;
        assert_eq!(out.activities.len(), 2);
        let out = remove_activities(&db, c.child.id, &[dance.id]).await?;
        assert_eq!(out.activities.iter().map(|a| a.id).collect::<Vec<_>>(), vec![swim.id]);

        let page = list_children(&db, PageRequest::default()).await?;
        assert_eq!(page.content[0].activities.len(), 1);

        assert!(clear_activities(&db, c.child.id).await?.activities.is_empty());
        assert!(matches!(remove_activities(&db, c.child.id, &[12345]).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
