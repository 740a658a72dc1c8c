use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::{refresh_token, user};

/// Public projection of a user. The only way to build one from a row is
/// `UserDto::from(&user::Model)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub is_activated: bool,
}

impl From<&user::Model> for UserDto {
    fn from(model: &user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email.clone(),
            is_activated: model.is_activated,
        }
    }
}

/// Public view of a stored refresh token, returned by logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub refresh_token: String,
}

impl From<&refresh_token::Model> for RefreshTokenRecord {
    fn from(model: &refresh_token::Model) -> Self {
        Self {
            user_id: model.user_id,
            refresh_token: model.refresh_token.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub email: String,
    pub is_activated: bool,
    pub iat: usize,
    pub exp: usize,
    /// Unique per token so pairs minted within the same second differ.
    pub jti: Uuid,
}

impl TokenClaims {
    pub fn user(&self) -> UserDto {
        UserDto {
            id: self.sub,
            email: self.email.clone(),
            is_activated: self.is_activated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
