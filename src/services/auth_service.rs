use std::sync::Arc;

use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        RefreshTokenRecord, TokenPair, UserDto,
        password::{hash_password_async, verify_password_async},
    },
    db::entities::user,
    error::AppError,
    mail::MailNotifier,
    routes::API_PREFIX,
    services::{token_service::TokenService, user_service::UserService},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Tokens plus the public view of the user they were issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserDto,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    tokens: TokenService,
    mailer: Arc<dyn MailNotifier>,
    api_url: String,
}

impl AuthService {
    pub fn new(
        users: UserService,
        tokens: TokenService,
        mailer: Arc<dyn MailNotifier>,
        api_url: &str,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn activation_url(&self, link: &str) -> String {
        format!("{}{API_PREFIX}/activate/{link}", self.api_url)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email"));
        }
        if password.is_empty() {
            return Err(AppError::validation("Password required"));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "registration rejected, email taken");
            return Err(AppError::validation(format!(
                "User with email {email} already exists"
            )));
        }

        let password_hash = hash_password_async(password.to_string()).await?;
        let activation_link = Uuid::new_v4().to_string();
        let user = self
            .users
            .create_user(&email, &password_hash, &activation_link)
            .await?;

        let url = self.activation_url(&activation_link);
        if let Err(err) = self.mailer.send_activation_mail(&email, &url).await {
            // roll back so the address can register again
            if let Err(delete_err) = self.users.delete(&user.id).await {
                error!(user_id = %user.id, error = %delete_err, "failed to roll back user");
            }
            return Err(AppError::internal_with_source(
                "failed to send activation mail",
                format!("{err:#}"),
            ));
        }

        let outcome = self.issue(&user).await?;
        info!(user_id = %user.id, "user registered");
        Ok(outcome)
    }

    pub async fn activate(&self, activation_link: &str) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_activation_link(activation_link)
            .await?
            .ok_or_else(|| AppError::validation("Invalid activation link"))?;

        self.users.activate(&user.id).await?;
        info!(user_id = %user.id, "user activated");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login rejected, unknown email");
            return Err(AppError::validation(INVALID_CREDENTIALS));
        };

        if !verify_password_async(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login rejected, wrong password");
            return Err(AppError::validation(INVALID_CREDENTIALS));
        }

        let outcome = self.issue(&user).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(outcome)
    }

    /// Returns the removed record, `None` when the token was not stored.
    pub async fn logout(
        &self,
        refresh_token: &str,
    ) -> Result<Option<RefreshTokenRecord>, AppError> {
        let removed = self.tokens.remove_token(refresh_token).await?;
        if let Some(record) = removed.as_ref() {
            info!(user_id = %record.user_id, "user logged out");
        }
        Ok(removed.as_ref().map(RefreshTokenRecord::from))
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthOutcome, AppError> {
        if refresh_token.is_empty() {
            return Err(AppError::unauthorized());
        }

        let claims = self
            .tokens
            .validate_refresh_token(refresh_token)
            .ok_or_else(AppError::unauthorized)?;

        let Some(record) = self.tokens.find_token(refresh_token).await? else {
            warn!(user_id = %claims.sub, "refresh token not on record");
            return Err(AppError::unauthorized());
        };
        if record.user_id != claims.sub {
            warn!(user_id = %claims.sub, "refresh token stored for another user");
            return Err(AppError::unauthorized());
        }

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(AppError::unauthorized)?;

        self.issue(&user).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserDto>, AppError> {
        let users = self.users.list_all().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }

    async fn issue(&self, user: &user::Model) -> Result<AuthOutcome, AppError> {
        let dto = UserDto::from(user);
        let tokens = self.tokens.generate_tokens(&dto)?;
        self.tokens.save_token(&user.id, &tokens.refresh_token).await?;
        Ok(AuthOutcome { tokens, user: dto })
    }
}
