use std::{ops::Deref, sync::Arc};

use axum::extract::FromRequestParts;

use crate::{
    auth::TokenClaims, error::AppError, middleware::bearer_token, services::ServiceContext,
    state::AppState,
};

/// Claims of the authenticated caller. Reuses what `jwt_auth` stored, or
/// validates the bearer header itself on routes without that layer.
#[derive(Debug, Clone)]
pub struct AuthGuard(pub TokenClaims);

impl Deref for AuthGuard {
    type Target = TokenClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<Arc<AppState>> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<TokenClaims>().cloned() {
            return Ok(Self(claims));
        }

        let token = bearer_token(&parts.headers).ok_or_else(AppError::unauthorized)?;
        ServiceContext::from_state(state.as_ref())
            .token()
            .validate_access_token(token)
            .map(Self)
            .ok_or_else(AppError::unauthorized)
    }
}
