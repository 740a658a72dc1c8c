pub mod auth;
mod router;
pub mod users;

pub use router::router;
