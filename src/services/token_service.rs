use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::{
        TokenClaims, TokenPair, UserDto,
        jwt::{JwtKeys, decode_token, encode_token, make_claims},
    },
    config::AuthConfig,
    db::{dao::RefreshTokenDao, entities::refresh_token},
    error::AppError,
};

/// Issues and verifies access/refresh pairs and keeps the one persisted
/// refresh token per user.
#[derive(Clone)]
pub struct TokenService {
    access_keys: JwtKeys,
    refresh_keys: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl_secs: usize,
    refresh_token_dao: RefreshTokenDao,
}

impl TokenService {
    pub fn new(cfg: &AuthConfig, refresh_token_dao: RefreshTokenDao) -> Self {
        Self {
            access_keys: JwtKeys::from_secret(cfg.access_secret.as_bytes()),
            refresh_keys: JwtKeys::from_secret(cfg.refresh_secret.as_bytes()),
            access_ttl_secs: cfg.access_ttl_secs as usize,
            refresh_ttl_secs: cfg.refresh_ttl_secs() as usize,
            refresh_token_dao,
        }
    }

    pub fn generate_tokens(&self, user: &UserDto) -> Result<TokenPair, AppError> {
        let access_token = encode_token(&self.access_keys, &make_claims(user, self.access_ttl_secs))?;
        let refresh_token =
            encode_token(&self.refresh_keys, &make_claims(user, self.refresh_ttl_secs))?;
        debug!(user_id = %user.id, "signed token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn validate_access_token(&self, token: &str) -> Option<TokenClaims> {
        decode_token(&self.access_keys, token)
            .map_err(|err| warn!(error = %err, "rejected access token"))
            .ok()
    }

    pub fn validate_refresh_token(&self, token: &str) -> Option<TokenClaims> {
        decode_token(&self.refresh_keys, token)
            .map_err(|err| warn!(error = %err, "rejected refresh token"))
            .ok()
    }

    pub async fn save_token(
        &self,
        user_id: &Uuid,
        refresh_token: &str,
    ) -> Result<refresh_token::Model, AppError> {
        Ok(self
            .refresh_token_dao
            .upsert_for_user(user_id, refresh_token)
            .await?)
    }

    pub async fn find_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<refresh_token::Model>, AppError> {
        Ok(self.refresh_token_dao.find_by_token(refresh_token).await?)
    }

    pub async fn remove_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<refresh_token::Model>, AppError> {
        Ok(self.refresh_token_dao.remove_by_token(refresh_token).await?)
    }
}
