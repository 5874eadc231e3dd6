use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::info;

use models::mail_history;
use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest};
use crate::repository;

const ENTITY: &str = "Mail history";

#[derive(Clone, Debug, Deserialize)]
pub struct CreateMailHistory {
    pub addresses: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Append one delivery record. History rows are never updated or deleted.
pub async fn create_mail_history(db: &DatabaseConnection, input: CreateMailHistory) -> Result<mail_history::Model, ServiceError> {
    mail_history::validate_addresses(&input.addresses)?;
    let created = mail_history::ActiveModel {
        addresses: Set(input.addresses),
        message: Set(input.message),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(service = "mail_history", event = "created", id = created.id);
    Ok(created)
}

pub async fn get_mail_history(db: &DatabaseConnection, id: i32) -> Result<mail_history::Model, ServiceError> {
    repository::find_by_id::<mail_history::Entity, _>(db, ENTITY, id).await
}

pub async fn list_mail_history(db: &DatabaseConnection, req: PageRequest) -> Result<Page<mail_history::Model>, ServiceError> {
    repository::fetch_page::<mail_history::Entity, _>(db, req, mail_history::Column::Id).await
}

/// All records sent to exactly these addresses, oldest first.
pub async fn find_by_addresses(db: &DatabaseConnection, addresses: &str) -> Result<Vec<mail_history::Model>, ServiceError> {
    repository::find_all_by::<mail_history::Entity, _>(db, mail_history::Column::Addresses, addresses, mail_history::Column::Id).await
}

pub async fn find_by_message(db: &DatabaseConnection, message: &str) -> Result<Vec<mail_history::Model>, ServiceError> {
    repository::find_all_by::<mail_history::Entity, _>(db, mail_history::Column::Message, message, mail_history::Column::Id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn sent(to: &str, message: &str) -> CreateMailHistory {
        CreateMailHistory { addresses: to.into(), message: Some(message.into()) }
    }

    #[tokio::test]
    async fn history_is_recorded_and_searchable() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let first = create_mail_history(&db, sent("marko@example.com", "March bill")).await?;
        create_mail_history(&db, sent("ana@example.com", "March bill")).await?;
        create_mail_history(&db, sent("marko@example.com", "April bill")).await?;

        assert_eq!(get_mail_history(&db, first.id).await?, first);
        let to_marko = find_by_addresses(&db, "marko@example.com").await?;
        assert_eq!(to_marko.len(), 2);
        assert_eq!(to_marko[0].id, first.id);
        assert_eq!(find_by_message(&db, "March bill").await?.len(), 2);
        assert!(find_by_message(&db, "march bill").await?.is_empty());

        let page = list_mail_history(&db, PageRequest::new(0, 2)?).await?;
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        Ok(())
    }

    #[tokio::test]
    async fn blank_addresses_rejected() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let res = create_mail_history(&db, sent("  ", "hello")).await;
        assert!(matches!(res, Err(ServiceError::Model(_))));
        Ok(())
    }
}
