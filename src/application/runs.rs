use crate::domain::run::{Run, RunPhase, RunSnapshot};
use crate::domain::transaction::TransactionId;
use crate::error::{OrchestratorError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Simulation runs by transaction id.
///
/// Runs outlive their transaction: an evicted transaction keeps its run here
/// for the lifetime of the table.
#[derive(Debug, Default, Clone)]
pub struct RunTable {
    runs: Arc<RwLock<HashMap<TransactionId, Arc<Run>>>>,
}

impl RunTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &TransactionId) -> Option<Arc<Run>> {
        self.runs.read().await.get(id).cloned()
    }

    /// Installs a fresh, empty run for `id`.
    ///
    /// Rejected with [`OrchestratorError::AlreadyRunning`] while the current
    /// run for `id` is still running. The check and the replacement happen
    /// under one write lock.
    pub async fn begin(&self, id: &TransactionId) -> Result<Arc<Run>> {
        let mut runs = self.runs.write().await;
        if let Some(current) = runs.get(id)
            && current.phase().await == RunPhase::Running
        {
            return Err(OrchestratorError::AlreadyRunning(id.clone()));
        }

        let run = Arc::new(Run::new());
        runs.insert(id.clone(), Arc::clone(&run));
        Ok(run)
    }

    pub async fn snapshot(&self, id: &TransactionId) -> RunSnapshot {
        match self.get(id).await {
            Some(run) => run.snapshot().await,
            None => RunSnapshot::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> TransactionId {
        "ab12cd34".parse().unwrap()
    }

    #[tokio::test]
    async fn test_unknown_id_has_empty_snapshot() {
        let table = RunTable::new();
        assert_eq!(table.snapshot(&id()).await, RunSnapshot::default());
    }

    #[tokio::test]
    async fn test_begin_rejects_running_run() {
        let table = RunTable::new();
        let run = table.begin(&id()).await.unwrap();
        run.append("step").await;

        assert!(matches!(
            table.begin(&id()).await,
            Err(OrchestratorError::AlreadyRunning(_))
        ));
        assert_eq!(table.snapshot(&id()).await.logs, vec!["step"]);
    }

    #[tokio::test]
    async fn test_begin_replaces_finished_run() {
        let table = RunTable::new();
        let first = table.begin(&id()).await.unwrap();
        first.append("old").await;
        first.complete().await;

        let second = table.begin(&id()).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        let snapshot = table.snapshot(&id()).await;
        assert!(snapshot.logs.is_empty());
        assert_eq!(snapshot.phase, Some(RunPhase::Running));
    }
}
