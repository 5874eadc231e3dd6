//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240501_000001_create_kindergarten_account;
mod m20240501_000002_create_groups;
mod m20240501_000003_create_activity;
mod m20240501_000004_create_parent;
mod m20240501_000005_create_user;
mod m20240501_000006_create_kindergarten;
mod m20240501_000007_create_child;
mod m20240501_000008_create_bill;
mod m20240501_000009_create_mail_history;
mod m20240501_000010_create_join_tables;
mod m20240501_000011_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_kindergarten_account::Migration),
            Box::new(m20240501_000002_create_groups::Migration),
            Box::new(m20240501_000003_create_activity::Migration),
            Box::new(m20240501_000004_create_parent::Migration),
            Box::new(m20240501_000005_create_user::Migration),
            Box::new(m20240501_000006_create_kindergarten::Migration),
            Box::new(m20240501_000007_create_child::Migration),
            Box::new(m20240501_000008_create_bill::Migration),
            Box::new(m20240501_000009_create_mail_history::Migration),
            Box::new(m20240501_000010_create_join_tables::Migration),
            // Indexes should always be applied last
            Box::new(m20240501_000011_add_indexes::Migration),
        ]
    }
}
