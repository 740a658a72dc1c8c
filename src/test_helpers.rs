use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    mail::MailNotifier,
    routes::router,
    services::ServiceContext,
    state::AppState,
};

/// Captures every activation mail instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingMailNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Activation link of the most recent mail to `to`.
    pub fn last_link_for(&self, to: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|(recipient, _)| recipient == to)
            .and_then(|(_, url)| url.rsplit('/').next().map(str::to_string))
    }
}

#[async_trait]
impl MailNotifier for RecordingMailNotifier {
    async fn send_activation_mail(&self, to: &str, activation_url: &str) -> anyhow::Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((to.to_string(), activation_url.to_string()));
        }
        Ok(())
    }
}

/// Always fails, for exercising the registration rollback.
#[derive(Clone, Default)]
pub struct FailingMailNotifier;

#[async_trait]
impl MailNotifier for FailingMailNotifier {
    async fn send_activation_mail(&self, _to: &str, _activation_url: &str) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay unavailable")
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.general.api_url = "http://api.test".to_string();
    cfg.auth.access_secret = "test-access-secret".to_string();
    cfg.auth.refresh_secret = "test-refresh-secret".to_string();
    cfg
}

/// Fresh in-memory SQLite database with the schema applied.
pub async fn memory_db() -> DatabaseConnection {
    let cfg = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    };
    connection::connect(&cfg)
        .await
        .expect("in-memory database should open")
}

pub async fn test_services(mailer: Arc<dyn MailNotifier>) -> ServiceContext {
    let db = memory_db().await;
    ServiceContext::new(&db, &test_config(), mailer)
}

pub async fn test_state(cfg: AppConfig, mailer: Arc<dyn MailNotifier>) -> Arc<AppState> {
    let db = memory_db().await;
    AppState::new(cfg, db, mailer)
}

pub async fn test_router(mailer: Arc<dyn MailNotifier>) -> Router {
    router(test_state(test_config(), mailer).await)
}
