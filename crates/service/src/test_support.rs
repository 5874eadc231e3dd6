#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use models::{activity, child, group, kindergarten, kindergarten_account, parent};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// A fresh, migrated in-memory database per test.
///
/// One pooled connection keeps every query on the same in-memory file.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut cfg = DatabaseConfig::with_url("sqlite::memory:");
    cfg.max_connections = 1;
    cfg.min_connections = 1;
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn seed_account(db: &DatabaseConnection, number: &str, ident: &str) -> Result<kindergarten_account::Model, anyhow::Error> {
    Ok(kindergarten_account::ActiveModel {
        bank_name: Set("Banca Intesa".into()),
        account_number: Set(number.into()),
        pib: Set("123456789".into()),
        identification_number: Set(ident.into()),
        activity_code: Set(Some(8510)),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Kindergarten with its own fresh account; the email is derived from the name.
pub async fn seed_kindergarten(db: &DatabaseConnection, name: &str) -> Result<kindergarten::Model, anyhow::Error> {
    let key = name.to_lowercase();
    let account = seed_account(db, &format!("160-{}", key), &format!("id-{}", key)).await?;
    Ok(kindergarten::ActiveModel {
        name: Set(name.into()),
        address: Set("Glavna 1".into()),
        phone_number: Set(Some("011123456".into())),
        email: Set(format!("{}@vrtic.rs", key)),
        logo: Set(None),
        account_id: Set(account.id),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn seed_activity(db: &DatabaseConnection, name: &str) -> Result<activity::Model, anyhow::Error> {
    Ok(activity::ActiveModel {
        name: Set(name.into()),
        price: Set(Decimal::new(1500, 0)),
        status: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn seed_group(db: &DatabaseConnection, name: &str) -> Result<group::Model, anyhow::Error> {
    Ok(group::ActiveModel {
        name: Set(name.into()),
        price: Set(Decimal::new(12000, 0)),
        discount: Set(Decimal::ZERO),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

pub async fn seed_parent(db: &DatabaseConnection, email: &str) -> Result<parent::Model, anyhow::Error> {
    Ok(parent::ActiveModel {
        name: Set("Marko".into()),
        surname: Set("Jovic".into()),
        email: Set(email.into()),
        address: Set("Glavna 2".into()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Group, parent and kindergarten ids a child can point at.
pub async fn seed_child_refs(db: &DatabaseConnection) -> Result<(i32, i32, i32), anyhow::Error> {
    let group = seed_group(db, "Butterflies").await?;
    let parent = seed_parent(db, "marko@example.com").await?;
    let kg = seed_kindergarten(db, "Bubamara").await?;
    Ok((group.id, parent.id, kg.id))
}

pub async fn seed_child(db: &DatabaseConnection, refs: (i32, i32, i32)) -> Result<child::Model, anyhow::Error> {
    Ok(child::ActiveModel {
        name: Set("Ana".into()),
        surname: Set("Jovic".into()),
        sibling_order: Set(1),
        birthday: Set(None),
        status: Set(true),
        group_id: Set(refs.0),
        parent_id: Set(refs.1),
        kindergarten_id: Set(refs.2),
        ..Default::default()
    }
    .insert(db)
    .await?)
}
