use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

use super::api;

pub const API_PREFIX: &str = "/api";

/// Full application: API routes plus the error, panic, CORS and trace layers.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.general.client_url.as_deref());

    Router::new()
        .nest(API_PREFIX, api::router(state))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let Some(client_url) = client_url else {
        return CorsLayer::permissive();
    };

    match HeaderValue::from_str(client_url.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(err) => {
            warn!(client_url = %client_url, error = %err, "invalid client url, CORS left permissive");
            CorsLayer::permissive()
        }
    }
}
