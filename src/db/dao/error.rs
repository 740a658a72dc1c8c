use sea_orm::{DbErr, SqlErr};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DaoLayerError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{entity} not found (id={id})")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("Invalid pagination: page={page} page_size={page_size}")]
    InvalidPagination { page: u64, page_size: u64 },
    #[error("{entity} conflicts with an existing row: {detail}")]
    Conflict { entity: &'static str, detail: String },
}

impl DaoLayerError {
    /// Splits unique-index violations out of write errors.
    pub fn from_write(entity: &'static str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict { entity, detail },
            _ => Self::Db(err),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoLayerError>;
