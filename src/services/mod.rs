pub mod auth_service;
pub mod context;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthOutcome, AuthService};
pub use context::ServiceContext;
