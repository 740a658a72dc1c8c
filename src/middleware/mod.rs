mod auth;
mod guards;
mod json_error;
mod panic;

pub use auth::{bearer_token, jwt_auth};
pub use guards::AuthGuard;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
