use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::AuthConfig,
    error::AppError,
    response::JsonApiResponse,
    routes::cookies::{clear_refresh_cookie, refresh_cookie, refresh_token_from},
    services::{AuthOutcome, ServiceContext},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/registration", post(registration))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/activate/{link}", get(activate).post(activate))
        .route("/refresh", get(refresh))
        .with_state(state)
}

async fn registration(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    let outcome = ServiceContext::from_state(state.as_ref())
        .auth()
        .register(&body.email, &body.password)
        .await?;
    with_refresh_cookie(&state.config.auth, outcome)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    let outcome = ServiceContext::from_state(state.as_ref())
        .auth()
        .login(&body.email, &body.password)
        .await?;
    with_refresh_cookie(&state.config.auth, outcome)
}

async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = refresh_token_from(&headers).unwrap_or_default();
    let removed = ServiceContext::from_state(state.as_ref())
        .auth()
        .logout(&token)
        .await?;

    let cookie = clear_refresh_cookie(&state.config.auth)
        .map_err(|err| AppError::internal_with_source("failed to build cookie", err))?;
    Ok(([(header::SET_COOKIE, cookie)], JsonApiResponse::ok(removed)?).into_response())
}

async fn activate(
    State(state): State<Arc<AppState>>,
    Path(link): Path<String>,
) -> Result<Response, AppError> {
    ServiceContext::from_state(state.as_ref())
        .auth()
        .activate(&link)
        .await?;

    match state.config.general.client_url.as_deref() {
        Some(client_url) => Ok(Redirect::to(client_url).into_response()),
        None => Ok(JsonApiResponse::ok(json!({ "activated": true }))?.into_response()),
    }
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = refresh_token_from(&headers).unwrap_or_default();
    let outcome = ServiceContext::from_state(state.as_ref())
        .auth()
        .refresh(&token)
        .await?;
    with_refresh_cookie(&state.config.auth, outcome)
}

fn with_refresh_cookie(cfg: &AuthConfig, outcome: AuthOutcome) -> Result<Response, AppError> {
    let cookie = refresh_cookie(cfg, &outcome.tokens.refresh_token)
        .map_err(|err| AppError::internal_with_source("failed to build cookie", err))?;
    Ok(([(header::SET_COOKIE, cookie)], JsonApiResponse::ok(outcome)?).into_response())
}
