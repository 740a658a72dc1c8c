use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{error::AppError, services::ServiceContext, state::AppState};

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid access token and stores its
/// `TokenClaims` in the request extensions.
pub async fn jwt_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(token) = bearer_token(req.headers()) else {
        warn!(path = %req.uri().path(), "missing bearer token");
        return Err(AppError::unauthorized().into_response());
    };

    let claims = ServiceContext::from_state(state.as_ref())
        .token()
        .validate_access_token(token)
        .ok_or_else(|| AppError::unauthorized().into_response())?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
