//! Set-valued many-to-many links kept in a join table.
//!
//! Callers load the owner inside a transaction and hand that transaction
//! here; any unresolved related id aborts before a single join row changes.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QuerySelect,
};

use crate::errors::ServiceError;

/// Join entity `J` linking an owner to related entity `R`.
pub struct Association<J: EntityTrait, R: EntityTrait> {
    /// Join column holding the owner id
    pub owner_col: J::Column,
    /// Join column holding the related id
    pub related_col: J::Column,
    /// Primary key column of `R`
    pub related_pk: R::Column,
    /// Display name of `R` for not-found messages
    pub related_name: &'static str,
    pub _marker: PhantomData<fn() -> (J, R)>,
}

impl<J, R> Association<J, R>
where
    J: EntityTrait,
    J::ActiveModel: ActiveModelTrait<Entity = J> + ActiveModelBehavior + Send,
    J::Model: IntoActiveModel<J::ActiveModel>,
    R: EntityTrait,
{
    /// Related ids currently linked to `owner_id`.
    pub async fn linked_ids<C: ConnectionTrait>(&self, conn: &C, owner_id: i32) -> Result<BTreeSet<i32>, ServiceError> {
        let ids: Vec<i32> = J::find()
            .select_only()
            .column(self.related_col)
            .filter(self.owner_col.eq(owner_id))
            .into_tuple()
            .all(conn)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Every id must exist in `R`; the first missing one is reported.
    async fn resolve<C: ConnectionTrait>(&self, conn: &C, ids: &[i32]) -> Result<BTreeSet<i32>, ServiceError> {
        let wanted: BTreeSet<i32> = ids.iter().copied().collect();
        if let Some(bad) = wanted.iter().find(|id| **id < 1) {
            return Err(ServiceError::Validation(format!("id must be greater than zero, got {}", bad)));
        }
        if wanted.is_empty() {
            return Ok(wanted);
        }
        let found: BTreeSet<i32> = R::find()
            .select_only()
            .column(self.related_pk)
            .filter(self.related_pk.is_in(wanted.iter().copied()))
            .into_tuple::<i32>()
            .all(conn)
            .await?
            .into_iter()
            .collect();
        if let Some(missing) = wanted.difference(&found).next() {
            return Err(ServiceError::not_found(self.related_name, *missing));
        }
        Ok(wanted)
    }

    /// Union `ids` into the owner's set; already linked ids are skipped.
    pub async fn add<C: ConnectionTrait>(&self, conn: &C, owner_id: i32, ids: &[i32]) -> Result<usize, ServiceError> {
        let wanted = self.resolve(conn, ids).await?;
        let existing = self.linked_ids(conn, owner_id).await?;
        let rows: Vec<J::ActiveModel> = wanted
            .difference(&existing)
            .map(|related_id| {
                let mut am = J::ActiveModel::default();
                am.set(self.owner_col, owner_id.into());
                am.set(self.related_col, (*related_id).into());
                am
            })
            .collect();
        let added = rows.len();
        if added > 0 {
            J::insert_many(rows).exec_without_returning(conn).await?;
        }
        Ok(added)
    }

    /// Drop the listed links; ids that exist but are not linked are ignored.
    pub async fn remove<C: ConnectionTrait>(&self, conn: &C, owner_id: i32, ids: &[i32]) -> Result<u64, ServiceError> {
        let wanted = self.resolve(conn, ids).await?;
        if wanted.is_empty() {
            return Ok(0);
        }
        let res = J::delete_many()
            .filter(self.owner_col.eq(owner_id))
            .filter(self.related_col.is_in(wanted))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    /// Remove every link of the owner.
    pub async fn clear<C: ConnectionTrait>(&self, conn: &C, owner_id: i32) -> Result<u64, ServiceError> {
        let res = J::delete_many().filter(self.owner_col.eq(owner_id)).exec(conn).await?;
        Ok(res.rows_affected)
    }
}
