// src/domain/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Task error: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum LedgerError {
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Product already exists: {0}")]
    DuplicateProduct(u64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(f64),

    #[error("Not enough stock for {product}! Available: {available}, requested: {requested}")]
    InsufficientStock {
        product: String,
        available: f64,
        requested: f64,
    },

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicked_task_becomes_task_error() {
        let handle = tokio::spawn(async { panic!("forecast task died") });

        let err: AppError = handle.await.unwrap_err().into();

        assert!(matches!(err, AppError::Task(_)));
    }

    #[test]
    fn ledger_errors_convert() {
        let err: AppError = LedgerError::ProductNotFound(7).into();
        assert_eq!(err.to_string(), "Ledger error: Product not found: 7");
    }
}
