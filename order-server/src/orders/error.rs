use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::models::OrderStatus;
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for: {}", .items.join(", "))]
    InsufficientStock { items: Vec<String> },

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("Unrecognized order status: {0}")]
    InvalidStatus(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Conflict(msg) => OrderError::Conflict(msg),
            RepoError::Validation(msg) => OrderError::Conflict(msg),
            RepoError::Database(msg) => OrderError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(msg) => AppError::not_found(msg),
            OrderError::EmptyCart
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidStatus(_)
            | OrderError::InvalidTransition { .. } => AppError::validation(err.to_string()),
            OrderError::InsufficientStock { .. } | OrderError::Conflict(_) => {
                AppError::conflict(err.to_string())
            }
            OrderError::Database(msg) => AppError::database(msg),
        }
    }
}
