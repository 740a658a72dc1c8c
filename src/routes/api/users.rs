use std::sync::Arc;

use axum::{Router, extract::State, middleware, routing::get};
use tracing::debug;

use crate::{
    auth::UserDto,
    middleware::{AuthGuard, jwt_auth},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
        .with_state(state)
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    caller: AuthGuard,
) -> ApiResult<Vec<UserDto>> {
    debug!(user_id = %caller.sub, "listing users");
    let users = ServiceContext::from_state(state.as_ref())
        .auth()
        .list_users()
        .await?;
    JsonApiResponse::ok(users)
}
