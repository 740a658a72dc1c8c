use std::fmt::Display;

use crate::db::dao::DaoLayerError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

pub const UNAUTHORIZED_MESSAGE: &str = "User is not authorized";

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Logs `source` and returns an internal error carrying only `context`.
    pub fn internal_with_source(context: &str, source: impl Display) -> Self {
        tracing::error!(error = %source, "{context}");
        Self::Internal(context.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::InvalidPagination { .. } => AppError::validation(err.to_string()),
            DaoLayerError::Conflict { .. } => AppError::validation(err.to_string()),
            DaoLayerError::Db(source) => AppError::internal_with_source("database error", source),
        }
    }
}
