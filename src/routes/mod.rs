pub mod api;
pub mod cookies;
mod entry;

pub use entry::{API_PREFIX, router};
