use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::mail::MailSender;

/// Shared handler state: the connection pool and the outbound mail seam.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn MailSender>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, mailer: Arc<dyn MailSender>) -> Self {
        Self { db, mailer }
    }
}
