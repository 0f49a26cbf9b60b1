//! Repository Module
//!
//! SQL access for every table, written as free functions over the pool
//! (or a transaction connection where the caller owns the boundary).
//! Business rules live in [`crate::orders`]; these functions only move rows.

pub mod cart;
pub mod category;
pub mod favorite;
pub mod food_item;
pub mod order;

use crate::utils::AppError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return RepoError::Duplicate(db_err.message().to_string());
                }
                ErrorKind::ForeignKeyViolation => {
                    return RepoError::Conflict(db_err.message().to_string());
                }
                ErrorKind::CheckViolation => {
                    return RepoError::Validation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
