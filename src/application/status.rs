//! Read-only views over the registry and the run table, for polling clients.

use super::runs::RunTable;
use crate::domain::ports::TransactionStoreRef;
use crate::domain::run::RunSnapshot;
use crate::domain::transaction::{Transaction, TransactionId, TransactionStatus};
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Display form of a live transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionView {
    pub tx_id: TransactionId,
    pub masked_origin: String,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            tx_id: tx.id.clone(),
            masked_origin: tx.masked_origin(),
            amount: tx.amount.value(),
            status: tx.status,
            created_at: tx.created_at,
        }
    }
}

#[derive(Clone)]
pub struct StatusService {
    transactions: TransactionStoreRef,
    runs: RunTable,
}

impl StatusService {
    pub fn new(transactions: TransactionStoreRef, runs: RunTable) -> Self {
        Self { transactions, runs }
    }

    /// Snapshot of the registry at call time, oldest first.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionView>> {
        let transactions = self.transactions.list().await?;
        Ok(transactions.iter().map(TransactionView::from).collect())
    }

    /// Whatever the run for `id` has produced so far. Never-started ids
    /// yield an empty snapshot.
    pub async fn get_run(&self, id: &TransactionId) -> RunSnapshot {
        self.runs.snapshot(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::infrastructure::in_memory::InMemoryTransactionStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_list_masks_origin() {
        let store = InMemoryTransactionStore::new();
        let tx = Transaction::new("whatsapp:+5511999991234", Amount::new(dec!(2000)).unwrap());
        crate::domain::ports::TransactionStore::put(&store, tx.clone())
            .await
            .unwrap();

        let status = StatusService::new(Arc::new(store), RunTable::new());
        let views = status.list_transactions().await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].tx_id, tx.id);
        assert_eq!(views[0].masked_origin, "+55 11 9****-1234");
        assert_eq!(views[0].amount, dec!(2000));
        assert_eq!(views[0].status, TransactionStatus::AwaitingFunds);
    }

    #[tokio::test]
    async fn test_view_serializes_display_fields() {
        let tx = Transaction::new("whatsapp:+5511999991234", Amount::new(dec!(12.50)).unwrap());
        let json = serde_json::to_value(TransactionView::from(&tx)).unwrap();

        assert_eq!(json["tx_id"], tx.id.as_str());
        assert_eq!(json["status"], "awaiting funds");
        assert_eq!(json["amount"], "12.50");
        assert!(json.get("origin").is_none());
    }

    #[tokio::test]
    async fn test_get_run_before_start_is_empty() {
        let status = StatusService::new(Arc::new(InMemoryTransactionStore::new()), RunTable::new());
        let snapshot = status.get_run(&"ab12cd34".parse().unwrap()).await;
        assert_eq!(snapshot, RunSnapshot::default());
    }
}
