//! Generic data access shared by every entity service.
//!
//! All helpers take any `ConnectionTrait`, so they run equally on the pool
//! and inside a transaction.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder, Value,
};

use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};

/// Load by primary key or fail with `"<entity> with id <id> not found"`.
pub async fn find_by_id<E, C>(conn: &C, entity: &str, id: i32) -> Result<E::Model, ServiceError>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    E::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::not_found(entity, id))
}

/// First row whose `col` equals `value`.
pub async fn find_one_by<E, C>(conn: &C, col: E::Column, value: impl Into<Value>) -> Result<Option<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find().filter(col.eq(value)).one(conn).await?)
}

/// Every row whose `col` equals `value`, in primary-key order.
pub async fn find_all_by<E, C>(
    conn: &C,
    col: E::Column,
    value: impl Into<Value>,
    order_by: E::Column,
) -> Result<Vec<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find().filter(col.eq(value)).order_by_asc(order_by).all(conn).await?)
}

/// Rows whose `col` is one of `values`; empty input short-circuits.
pub async fn find_all_in<E, C>(conn: &C, col: E::Column, values: Vec<i32>) -> Result<Vec<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if values.is_empty() {
        return Ok(Vec::new());
    }
    Ok(E::find().filter(col.is_in(values)).all(conn).await?)
}

/// True when a row other than `exclude_id` already holds `value` in `col`.
pub async fn is_taken<E, C>(
    conn: &C,
    col: E::Column,
    value: impl Into<Value>,
    id_col: E::Column,
    exclude_id: Option<i32>,
) -> Result<bool, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut query = E::find().filter(col.eq(value));
    if let Some(id) = exclude_id {
        query = query.filter(id_col.ne(id));
    }
    Ok(query.one(conn).await?.is_some())
}

/// One page ordered by `order_by`, with the total row count.
pub async fn fetch_page<E, C>(conn: &C, req: PageRequest, order_by: E::Column) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let paginator = E::find().order_by_asc(order_by).paginate(conn, req.size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(req.page).await?;
    Ok(Page::new(items, total, req))
}
