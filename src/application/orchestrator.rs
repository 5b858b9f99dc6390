use super::runs::RunTable;
use super::status::StatusService;
use crate::config::SimulationConfig;
use crate::domain::money::{Amount, Settlement};
use crate::domain::pipeline::Pipeline;
use crate::domain::ports::{ClockRef, NotifierRef, TransactionStoreRef};
use crate::domain::run::{Run, RunPhase};
use crate::domain::transaction::{Transaction, TransactionId, TransactionStatus};
use crate::error::{OrchestratorError, Result};
use futures::FutureExt;
use rust_decimal::Decimal;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// State shared between the orchestrator and its workers.
struct Shared {
    transactions: TransactionStoreRef,
    runs: RunTable,
    clock: ClockRef,
    notifier: NotifierRef,
    pipeline: Pipeline,
    brand: String,
    /// Held by `start` and by a worker while it evicts and completes, so a
    /// start never sees an evicted transaction with a still-running run.
    lifecycle: Mutex<()>,
}

/// Drives the simulated settlement of registered transactions.
///
/// Each `start` spawns one background worker that walks the pipeline, logs
/// every step into the transaction's run, records the settlement, notifies
/// the origin and finally evicts the transaction from the registry. Handles of
/// unfinished workers are kept so callers can await them with
/// [`Orchestrator::wait_for`] or [`Orchestrator::shutdown`].
///
/// A second `start` for a transaction whose run is still in progress is
/// rejected with [`OrchestratorError::AlreadyRunning`].
pub struct Orchestrator {
    shared: Arc<Shared>,
    workers: Mutex<HashMap<TransactionId, JoinHandle<()>>>,
}

impl Orchestrator {
    /// Creates a new `Orchestrator`.
    ///
    /// # Arguments
    ///
    /// * `transactions` - The registry of live transactions.
    /// * `clock` - Source of the per-step waits.
    /// * `notifier` - Delivers the completion message to the origin.
    /// * `config` - Exchange rate, spread, step delays and brand.
    pub fn new(
        transactions: TransactionStoreRef,
        clock: ClockRef,
        notifier: NotifierRef,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                transactions,
                runs: RunTable::new(),
                clock,
                notifier,
                pipeline: config.pipeline(),
                brand: config.brand.clone(),
                lifecycle: Mutex::new(()),
            }),
            workers: Mutex::new(HashMap::new()),
        }
    }

    pub fn status(&self) -> StatusService {
        StatusService::new(
            Arc::clone(&self.shared.transactions),
            self.shared.runs.clone(),
        )
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.shared.pipeline
    }

    /// Registers a new transaction awaiting funds.
    pub async fn create_transaction(
        &self,
        origin: impl Into<String>,
        amount: Decimal,
    ) -> Result<Transaction> {
        let tx = Transaction::new(origin, Amount::new(amount)?);
        self.shared.transactions.put(tx.clone()).await?;
        tracing::info!(tx_id = %tx.id, amount = %tx.amount.value(), "transaction created");
        Ok(tx)
    }

    /// Starts the simulation for `id` and returns without waiting for it.
    ///
    /// Any previous run for `id` is replaced by an empty one.
    pub async fn start(&self, id: &TransactionId) -> Result<()> {
        let _lifecycle = self.shared.lifecycle.lock().await;
        let Some(mut tx) = self.shared.transactions.get(id).await? else {
            return Err(OrchestratorError::NotFound(id.clone()));
        };

        let run = match self.shared.runs.begin(id).await {
            Ok(run) => run,
            Err(e) => {
                tracing::warn!(tx_id = %id, "simulation start rejected: {e}");
                return Err(e);
            }
        };

        tx.status = TransactionStatus::Settling;
        self.shared.transactions.put(tx.clone()).await?;

        tracing::info!(tx_id = %id, "simulation started");
        let handle = tokio::spawn(run_worker(Arc::clone(&self.shared), tx, run));
        let mut workers = self.workers.lock().await;
        workers.retain(|_, handle| !handle.is_finished());
        workers.insert(id.clone(), handle);
        Ok(())
    }

    /// Number of workers still tracked. Finished workers are dropped here and
    /// on every `start`.
    pub async fn tracked_workers(&self) -> usize {
        let mut workers = self.workers.lock().await;
        workers.retain(|_, handle| !handle.is_finished());
        workers.len()
    }

    pub async fn run_phase(&self, id: &TransactionId) -> Option<RunPhase> {
        match self.shared.runs.get(id).await {
            Some(run) => Some(run.phase().await),
            None => None,
        }
    }

    /// Waits for the worker of `id`, if one is tracked.
    pub async fn wait_for(&self, id: &TransactionId) -> Result<()> {
        let handle = self.workers.lock().await.remove(id);
        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| OrchestratorError::Worker(format!("worker for {id}: {e}"))),
            None => Ok(()),
        }
    }

    /// Waits for every tracked worker. Reports the first worker error, after
    /// all of them have finished.
    pub async fn shutdown(&self) -> Result<()> {
        let handles: Vec<(TransactionId, JoinHandle<()>)> =
            self.workers.lock().await.drain().collect();

        let mut first_error = None;
        for (id, handle) in handles {
            if let Err(e) = handle.await {
                tracing::error!(tx_id = %id, "worker did not finish cleanly: {e}");
                first_error.get_or_insert(OrchestratorError::Worker(format!(
                    "worker for {id}: {e}"
                )));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

async fn run_worker(shared: Arc<Shared>, tx: Transaction, run: Arc<Run>) {
    let outcome = AssertUnwindSafe(simulate(&shared, &tx, &run))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(settlement)) => notify(&shared, &tx, &run, &settlement).await,
        Ok(Err(e)) => {
            tracing::error!(tx_id = %tx.id, "simulation failed: {e}");
            run.fail(&e.to_string()).await;
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            tracing::error!(tx_id = %tx.id, "simulation worker panicked: {reason}");
            run.fail(&reason).await;
        }
    }

    let _lifecycle = shared.lifecycle.lock().await;
    if let Err(e) = shared.transactions.remove(&tx.id).await {
        tracing::error!(tx_id = %tx.id, "failed to evict transaction: {e}");
        run.append(format!("[ALERT] failed to evict transaction: {e}"))
            .await;
    } else {
        tracing::debug!(tx_id = %tx.id, "transaction evicted");
    }

    run.complete().await;
}

async fn simulate(shared: &Shared, tx: &Transaction, run: &Run) -> Result<Settlement> {
    for step in shared.pipeline.steps() {
        shared.clock.sleep(step.delay).await;
        run.append(step.message.as_str()).await;
        tracing::debug!(tx_id = %tx.id, step = %step.message);
    }

    let settlement = shared.pipeline.settle(tx.amount.value())?;
    run.record_result(settlement.clone()).await?;
    tracing::info!(
        tx_id = %tx.id,
        gross = %settlement.gross,
        fee = %settlement.fee,
        net = %settlement.net,
        "settlement computed"
    );
    Ok(settlement)
}

async fn notify(shared: &Shared, tx: &Transaction, run: &Run, settlement: &Settlement) {
    let message = format!(
        "{}: funds settled. Net amount {:.2} was transferred to your account.",
        shared.brand, settlement.net
    );

    let delivery = AssertUnwindSafe(shared.notifier.send(&tx.origin, &message))
        .catch_unwind()
        .await;
    let reason = match delivery {
        Ok(Ok(())) => return,
        Ok(Err(OrchestratorError::Notification(reason))) => reason,
        Ok(Err(other)) => other.to_string(),
        Err(panic) => panic_message(panic.as_ref()),
    };

    tracing::warn!(tx_id = %tx.id, "notification delivery failed: {reason}");
    run.append(format!("[ALERT] notification delivery failed: {reason}"))
        .await;
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
