pub mod errors;
pub mod db;
pub mod timestamps;
pub mod validation;

pub mod activity;
pub mod bill;
pub mod child;
pub mod child_activities;
pub mod group;
pub mod kindergarten;
pub mod kindergarten_account;
pub mod kindergarten_activity;
pub mod kindergarten_groups;
pub mod mail_history;
pub mod parent;
pub mod user;
