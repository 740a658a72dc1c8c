use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, mail::MailNotifier};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub mailer: Arc<dyn MailNotifier>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        mailer: Arc<dyn MailNotifier>,
    ) -> Arc<Self> {
        Arc::new(Self { config, db, mailer })
    }
}
