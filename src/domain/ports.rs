use super::transaction::{Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Registry of live transactions, keyed by id.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts or replaces a transaction.
    async fn put(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>>;
    /// All current transactions, oldest first.
    async fn list(&self) -> Result<Vec<Transaction>>;
    /// Evicts a transaction; absent ids are ignored.
    async fn remove(&self, id: &TransactionId) -> Result<()>;
}

/// Source of simulated waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Best-effort delivery of a message to a transaction's origin.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &str, message: &str) -> Result<()>;
}

pub type TransactionStoreRef = Arc<dyn TransactionStore>;
pub type ClockRef = Arc<dyn Clock>;
pub type NotifierRef = Arc<dyn Notifier>;
