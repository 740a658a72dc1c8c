use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::{AppConfig, AuthConfig},
    db::dao::DaoContext,
    mail::MailNotifier,
    services::{auth_service::AuthService, token_service::TokenService, user_service::UserService},
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    auth: AuthConfig,
    api_url: String,
    mailer: Arc<dyn MailNotifier>,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection, cfg: &AppConfig, mailer: Arc<dyn MailNotifier>) -> Self {
        Self {
            daos: DaoContext::new(db),
            auth: cfg.auth.clone(),
            api_url: cfg.general.api_url.clone(),
            mailer,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db, &state.config, Arc::clone(&state.mailer))
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn token(&self) -> TokenService {
        TokenService::new(&self.auth, self.daos.refresh_token())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.user(),
            self.token(),
            Arc::clone(&self.mailer),
            &self.api_url,
        )
    }
}
