use super::money::Settlement;
use crate::error::{OrchestratorError, Result};
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Running,
    Completed,
    Failed,
}

/// Point-in-time copy of a run, as returned to polling readers.
///
/// A transaction that was never simulated yields the default snapshot:
/// no logs, no result, no phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub logs: Vec<String>,
    pub result: Option<Settlement>,
    pub phase: Option<RunPhase>,
}

#[derive(Debug)]
struct RunState {
    logs: Vec<String>,
    result: Option<Settlement>,
    phase: RunPhase,
}

/// Log buffer and result slot of one simulation.
///
/// Written only by the worker that owns it. Each mutation takes the lock
/// once, so readers see whole log lines in append order and either no
/// result or the complete one.
#[derive(Debug)]
pub struct Run {
    state: RwLock<RunState>,
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

impl Run {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RunState {
                logs: Vec::new(),
                result: None,
                phase: RunPhase::Running,
            }),
        }
    }

    pub async fn append(&self, line: impl Into<String>) {
        self.state.write().await.logs.push(line.into());
    }

    /// Records the settlement. A run accepts exactly one result.
    pub async fn record_result(&self, settlement: Settlement) -> Result<()> {
        let mut state = self.state.write().await;
        if state.result.is_some() {
            return Err(OrchestratorError::Settlement(
                "result already recorded for this run".to_string(),
            ));
        }
        state.result = Some(settlement);
        Ok(())
    }

    /// Ends the run as failed, leaving an alert line in its log.
    pub async fn fail(&self, reason: &str) {
        let mut state = self.state.write().await;
        state
            .logs
            .push(format!("[ALERT] simulation failed: {reason}"));
        state.phase = RunPhase::Failed;
    }

    /// Marks a still-running run as completed. Failed runs stay failed.
    pub async fn complete(&self) {
        let mut state = self.state.write().await;
        if state.phase == RunPhase::Running {
            state.phase = RunPhase::Completed;
        }
    }

    pub async fn phase(&self) -> RunPhase {
        self.state.read().await.phase
    }

    pub async fn snapshot(&self) -> RunSnapshot {
        let state = self.state.read().await;
        RunSnapshot {
            logs: state.logs.clone(),
            result: state.result.clone(),
            phase: Some(state.phase),
        }
    }
}
