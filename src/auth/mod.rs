pub mod jwt;
pub mod password;
mod types;

pub use types::{RefreshTokenRecord, TokenClaims, TokenPair, UserDto};
