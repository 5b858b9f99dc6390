use crate::domain::transaction::TransactionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("transaction not found: {0}")]
    NotFound(TransactionId),
    #[error("simulation already running for transaction {0}")]
    AlreadyRunning(TransactionId),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("notification delivery failed: {0}")]
    Notification(String),
    #[error("settlement error: {0}")]
    Settlement(String),
    #[error("worker error: {0}")]
    Worker(String),
    #[error("invalid value for {name}: {message}")]
    Config { name: String, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
