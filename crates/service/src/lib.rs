//! Service layer providing kindergarten administration operations on top of models.
//! - One module per resource; every multi-step write runs in one transaction.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Store constraint errors surface as `ServiceError::Conflict`.

pub mod errors;
pub mod pagination;
pub mod patch;
pub mod repository;
pub mod associations;
pub mod audit;
pub mod password;
pub mod mail;

pub mod activity_service;
pub mod group_service;
pub mod parent_service;
pub mod user_service;
pub mod account_service;
pub mod kindergarten_service;
pub mod child_service;
pub mod bill_service;
pub mod mail_history_service;

#[cfg(test)]
pub mod test_support;
