use crate::domain::ports::TransactionStore;
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory registry of transactions.
///
/// Uses `Arc<RwLock<HashMap<TransactionId, Transaction>>>` so the registry can be
/// shared between request handlers and simulation workers. Contents live only
/// as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn put(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id.clone(), tx);
        Ok(())
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<Transaction> = transactions.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn remove(&self, id: &TransactionId) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::domain::transaction::TransactionStatus;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn transaction(amount: rust_decimal::Decimal) -> Transaction {
        Transaction::new("whatsapp:+5511999991234", Amount::new(amount).unwrap())
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryTransactionStore::new();
        let tx = transaction(dec!(100.0));

        store.put(tx.clone()).await.unwrap();
        let retrieved = store.get(&tx.id).await.unwrap().unwrap();
        assert_eq!(retrieved, tx);

        let missing: TransactionId = "deadbeef".parse().unwrap();
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_existing() {
        let store = InMemoryTransactionStore::new();
        let mut tx = transaction(dec!(100.0));
        store.put(tx.clone()).await.unwrap();

        tx.status = TransactionStatus::Settling;
        store.put(tx.clone()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, TransactionStatus::Settling);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_creation() {
        let store = InMemoryTransactionStore::new();
        let now = Utc::now();

        let mut newer = transaction(dec!(2.0));
        newer.created_at = now;
        let mut older = transaction(dec!(1.0));
        older.created_at = now - Duration::seconds(5);

        store.put(newer.clone()).await.unwrap();
        store.put(older.clone()).await.unwrap();

        let ids: Vec<TransactionId> = store.list().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = InMemoryTransactionStore::new();
        let tx = transaction(dec!(1.0));
        store.put(tx.clone()).await.unwrap();

        store.remove(&tx.id).await.unwrap();
        store.remove(&tx.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
