use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::info;

use models::{bill, child, kindergarten};
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::patch::Patch;
use crate::{audit, repository};

const ENTITY: &str = "Bill";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateBill {
    pub year: i16,
    pub month: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub bill_code: Option<String>,
    #[serde(default)]
    pub payment_sum: Option<Decimal>,
    #[serde(default)]
    pub kindergarten_id: Option<i32>,
    #[serde(default)]
    pub child_id: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateBill {
    pub year: Option<i16>,
    pub month: Option<String>,
    #[serde(default)]
    pub deadline: Patch<NaiveDate>,
    #[serde(default)]
    pub bill_code: Patch<String>,
    #[serde(default)]
    pub payment_sum: Option<Decimal>,
    pub kindergarten_id: Option<i32>,
    pub child_id: Option<i32>,
}

async fn load<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bill::Model, ServiceError> {
    repository::find_by_id::<bill::Entity, _>(conn, ENTITY, id).await
}

async fn resolve_refs<C: ConnectionTrait>(
    conn: &C,
    kindergarten_id: Option<i32>,
    child_id: Option<i32>,
) -> Result<(), ServiceError> {
    if let Some(id) = kindergarten_id {
        repository::find_by_id::<kindergarten::Entity, _>(conn, "Kindergarten", id).await?;
    }
    if let Some(id) = child_id {
        repository::find_by_id::<child::Entity, _>(conn, "Child", id).await?;
    }
    Ok(())
}

/// Issue a bill for a child of a kindergarten. The sum defaults to zero.
pub async fn create_bill(db: &DatabaseConnection, input: CreateBill) -> Result<bill::Model, ServiceError> {
    bill::validate_month(&input.month)?;
    let payment_sum = input.payment_sum.unwrap_or(Decimal::ZERO);
    bill::validate_payment_sum(payment_sum)?;
    let kindergarten_id = input.kindergarten_id.ok_or_else(|| ServiceError::missing_reference("Kindergarten id"))?;
    let child_id = input.child_id.ok_or_else(|| ServiceError::missing_reference("Child id"))?;

    let txn = db.begin().await?;
    resolve_refs(&txn, Some(kindergarten_id), Some(child_id)).await?;
    let created = bill::ActiveModel {
        year: Set(input.year),
        month: Set(input.month),
        deadline: Set(input.deadline),
        bill_code: Set(input.bill_code),
        payment_sum: Set(payment_sum),
        kindergarten_id: Set(kindergarten_id),
        child_id: Set(child_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "bill", event = "created", id = created.id, child_id, kindergarten_id);
    Ok(created)
}

pub async fn get_bill(db: &DatabaseConnection, id: i32) -> Result<bill::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_bills(db: &DatabaseConnection, req: PageRequest) -> Result<Page<bill::Model>, ServiceError> {
    repository::fetch_page::<bill::Entity, _>(db, req, bill::Column::Id).await
}

pub async fn update_bill(db: &DatabaseConnection, id: i32, input: UpdateBill) -> Result<bill::Model, ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    let mut am: bill::ActiveModel = current.clone().into();

    resolve_refs(&txn, input.kindergarten_id, input.child_id).await?;

    if let Some(year) = input.year {
        am.year = Set(year);
    }
    if let Some(month) = input.month {
        bill::validate_month(&month)?;
        am.month = Set(month);
    }
    input.deadline.apply(&mut am.deadline);
    input.bill_code.apply(&mut am.bill_code);
    if let Some(payment_sum) = input.payment_sum {
        bill::validate_payment_sum(payment_sum)?;
        am.payment_sum = Set(payment_sum);
    }
    if let Some(kindergarten_id) = input.kindergarten_id {
        am.kindergarten_id = Set(kindergarten_id);
    }
    if let Some(child_id) = input.child_id {
        am.child_id = Set(child_id);
    }

    if !am.is_changed() {
        return Ok(current);
    }
    let updated = am.update(&txn).await?;
    txn.commit().await?;
    info!(service = "bill", event = "updated", id);
    Ok(updated)
}

pub async fn delete_bill(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = load(&txn, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_child, seed_child_refs};

    async fn march(db: &DatabaseConnection) -> Result<CreateBill, anyhow::Error> {
        let refs = seed_child_refs(db).await?;
        let c = seed_child(db, refs).await?;
        Ok(CreateBill {
            year: 2024,
            month: "March".into(),
            deadline: NaiveDate::from_ymd_opt(2024, 3, 15),
            bill_code: Some("97-2024-03".into()),
            payment_sum: None,
            kindergarten_id: Some(refs.2),
            child_id: Some(c.id),
        })
    }

    #[tokio::test]
    async fn bill_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let b = create_bill(&db, march(&db).await?).await?;
        assert_eq!(b.payment_sum, Decimal::ZERO);
        assert_eq!(get_bill(&db, b.id).await?, b);

        let paid = update_bill(
            &db,
            b.id,
            UpdateBill { payment_sum: Some(Decimal::new(1250050, 2)), bill_code: Patch::Null, ..Default::default() },
        )
        .await?;
        assert_eq!(paid.payment_sum, Decimal::new(1250050, 2));
        assert_eq!(paid.bill_code, None);
        assert_eq!(paid.deadline, b.deadline);

        let page = list_bills(&db, PageRequest::default()).await?;
        assert_eq!(page.total_elements, 1);

        delete_bill(&db, b.id).await?;
        assert!(matches!(get_bill(&db, b.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_keeps_record() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let b = create_bill(&db, march(&db).await?).await?;
        assert_eq!(update_bill(&db, b.id, UpdateBill::default()).await?, b);
        Ok(())
    }

    #[tokio::test]
    async fn child_must_exist() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let input = march(&db).await?;
        let res = create_bill(&db, CreateBill { child_id: Some(404), ..input.clone() }).await;
        assert!(matches!(res, Err(ServiceError::NotFound(m)) if m == "Child with id 404 not found"));
        let res = create_bill(&db, CreateBill { child_id: None, ..input }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn billed_child_cannot_be_deleted() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let b = create_bill(&db, march(&db).await?).await?;
        let res = crate::child_service::delete_child(&db, b.child_id).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        Ok(())
    }
}
