use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, ModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use models::{kindergarten, kindergarten_account};
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::patch::Patch;
use crate::{audit, repository};

pub(crate) const ENTITY: &str = "Kindergarten account";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateAccount {
    pub bank_name: String,
    pub account_number: String,
    pub pib: String,
    pub identification_number: String,
    #[serde(default)]
    pub activity_code: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateAccount {
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub pib: Option<String>,
    pub identification_number: Option<String>,
    #[serde(default)]
    pub activity_code: Patch<i32>,
}

/// Account as returned to clients, with the owning kindergarten if linked.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub account: kindergarten_account::Model,
    pub kindergarten_id: Option<i32>,
}

pub(crate) fn account_not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("{} with id = {} not found", ENTITY, id))
}

pub(crate) async fn load_account<C: ConnectionTrait>(conn: &C, id: i32) -> Result<kindergarten_account::Model, ServiceError> {
    repository::find_by_id::<kindergarten_account::Entity, _>(conn, ENTITY, id)
        .await
        .map_err(|e| match e {
            ServiceError::NotFound(_) => account_not_found(id),
            other => other,
        })
}

async fn view<C: ConnectionTrait>(conn: &C, account: kindergarten_account::Model) -> Result<AccountView, ServiceError> {
    let owner = account.find_related(kindergarten::Entity).one(conn).await?;
    Ok(AccountView { kindergarten_id: owner.map(|k| k.id), account })
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    account_number: Option<&str>,
    identification_number: Option<&str>,
    exclude: Option<i32>,
) -> Result<(), ServiceError> {
    use kindergarten_account::{Column, Entity};
    if let Some(v) = account_number {
        if repository::is_taken::<Entity, _>(conn, Column::AccountNumber, v, Column::Id, exclude).await? {
            warn!(service = "account", event = "conflict", account_number = %v);
            return Err(ServiceError::Conflict("Account number already exists".into()));
        }
    }
    if let Some(v) = identification_number {
        if repository::is_taken::<Entity, _>(conn, Column::IdentificationNumber, v, Column::Id, exclude).await? {
            warn!(service = "account", event = "conflict", identification_number = %v);
            return Err(ServiceError::Conflict("Identification number already exists".into()));
        }
    }
    Ok(())
}

/// Create an account. It is linked to a kindergarten when that kindergarten
/// is created.
pub async fn create_account(db: &DatabaseConnection, input: CreateAccount) -> Result<AccountView, ServiceError> {
    kindergarten_account::validate_new(&input.bank_name, &input.account_number, &input.pib, &input.identification_number)?;

    let txn = db.begin().await?;
    ensure_unique(&txn, Some(&input.account_number), Some(&input.identification_number), None).await?;
    let created = kindergarten_account::ActiveModel {
        bank_name: Set(input.bank_name),
        account_number: Set(input.account_number),
        pib: Set(input.pib),
        identification_number: Set(input.identification_number),
        activity_code: Set(input.activity_code),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(service = "account", event = "created", id = created.id);
    Ok(AccountView { account: created, kindergarten_id: None })
}

pub async fn get_account(db: &DatabaseConnection, id: i32) -> Result<AccountView, ServiceError> {
    let account = load_account(db, id).await?;
    view(db, account).await
}

pub async fn get_account_by_number(db: &DatabaseConnection, account_number: &str) -> Result<AccountView, ServiceError> {
    let account = repository::find_one_by::<kindergarten_account::Entity, _>(
        db,
        kindergarten_account::Column::AccountNumber,
        account_number,
    )
    .await?
    .ok_or_else(|| ServiceError::not_found_by(ENTITY, "account number", account_number))?;
    view(db, account).await
}

pub async fn get_account_by_identification(db: &DatabaseConnection, identification_number: &str) -> Result<AccountView, ServiceError> {
    let account = repository::find_one_by::<kindergarten_account::Entity, _>(
        db,
        kindergarten_account::Column::IdentificationNumber,
        identification_number,
    )
    .await?
    .ok_or_else(|| ServiceError::not_found_by(ENTITY, "identification number", identification_number))?;
    view(db, account).await
}

pub async fn list_accounts(db: &DatabaseConnection, req: PageRequest) -> Result<Page<AccountView>, ServiceError> {
    let page = repository::fetch_page::<kindergarten_account::Entity, _>(db, req, kindergarten_account::Column::Id).await?;
    let ids: Vec<i32> = page.content.iter().map(|a| a.id).collect();
    let owners = repository::find_all_in::<kindergarten::Entity, _>(db, kindergarten::Column::AccountId, ids).await?;
    Ok(page.map(|account| {
        let kindergarten_id = owners.iter().find(|k| k.account_id == account.id).map(|k| k.id);
        AccountView { account, kindergarten_id }
    }))
}

/// Merge the supplied fields; `pib` is re-checked against the nine-digit rule.
pub async fn update_account(db: &DatabaseConnection, id: i32, input: UpdateAccount) -> Result<AccountView, ServiceError> {
    let txn = db.begin().await?;
    let current = load_account(&txn, id).await?;
    let mut am: kindergarten_account::ActiveModel = current.clone().into();

    let new_number = input.account_number.as_deref().filter(|v| *v != current.account_number);
    let new_ident = input.identification_number.as_deref().filter(|v| *v != current.identification_number);
    ensure_unique(&txn, new_number, new_ident, Some(id)).await?;

    if let Some(pib) = input.pib {
        kindergarten_account::validate_pib(&pib)?;
        am.pib = Set(pib);
    }
    if let Some(bank_name) = input.bank_name {
        models::validation::not_blank("bank_name", &bank_name)?;
        am.bank_name = Set(bank_name);
    }
    if let Some(account_number) = input.account_number {
        models::validation::not_blank("account_number", &account_number)?;
        am.account_number = Set(account_number);
    }
    if let Some(identification_number) = input.identification_number {
        models::validation::not_blank("identification_number", &identification_number)?;
        am.identification_number = Set(identification_number);
    }
    input.activity_code.apply(&mut am.activity_code);

    let saved = if am.is_changed() { am.update(&txn).await? } else { current };
    let out = view(&txn, saved).await?;
    txn.commit().await?;
    info!(service = "account", event = "updated", id);
    Ok(out)
}

/// Delete an account. Fails with a conflict while a kindergarten uses it.
pub async fn delete_account(db: &DatabaseConnection, id: i32) -> Result<(), ServiceError> {
    let txn = db.begin().await?;
    let current = load_account(&txn, id).await?;
    audit::record_delete(ENTITY, id, &current);
    current.delete(&txn).await?;
    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn intesa() -> CreateAccount {
        CreateAccount {
            bank_name: "Banca Intesa".into(),
            account_number: "160-0000000001-11".into(),
            pib: "123456789".into(),
            identification_number: "08012345".into(),
            activity_code: Some(8510),
        }
    }

    #[tokio::test]
    async fn account_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_account(&db, intesa()).await?;
        assert_eq!(a.kindergarten_id, None);
        assert_eq!(get_account_by_number(&db, "160-0000000001-11").await?.account.id, a.account.id);
        assert_eq!(get_account_by_identification(&db, "08012345").await?.account.id, a.account.id);

        let cleared = update_account(&db, a.account.id, UpdateAccount { activity_code: Patch::Null, ..Default::default() }).await?;
        assert_eq!(cleared.account.activity_code, None);
        assert_eq!(cleared.account.bank_name, "Banca Intesa");

        delete_account(&db, a.account.id).await?;
        assert!(matches!(get_account(&db, a.account.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn empty_patch_leaves_account_unchanged() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_account(&db, intesa()).await?;
        assert_eq!(update_account(&db, a.account.id, UpdateAccount::default()).await?, a);
        assert_eq!(get_account(&db, a.account.id).await?, a);
        Ok(())
    }

    #[tokio::test]
    async fn pib_must_have_nine_digits() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let bad = create_account(&db, CreateAccount { pib: "12345".into(), ..intesa() }).await;
        assert!(matches!(bad, Err(ServiceError::Model(_))));
        let arabic = create_account(&db, CreateAccount { pib: "١٢٣٤٥٦٧٨٩".into(), ..intesa() }).await;
        assert!(matches!(arabic, Err(ServiceError::Model(_))));

        let a = create_account(&db, intesa()).await?;
        let res = update_account(&db, a.account.id, UpdateAccount { pib: Some("12345678a".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Model(models::errors::ModelError::Validation(_)))));
        Ok(())
    }

    #[tokio::test]
    async fn unique_numbers_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_account(&db, intesa()).await?;
        let res = create_account(&db, CreateAccount { identification_number: "999".into(), ..intesa() }).await;
        assert!(matches!(res, Err(ServiceError::Conflict(m)) if m == "Account number already exists"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_account_message() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        match get_account(&db, 42).await {
            Err(ServiceError::NotFound(m)) => assert_eq!(m, "Kindergarten account with id = 42 not found"),
            other => panic!("unexpected {:?}", other),
        }
        Ok(())
    }
}
